//! Terminal class picker for ambiguous method names.

use crate::error::{Error, Result};
use crate::model::MethodTarget;
use crate::resolver::Chooser;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Select};

/// Rows shown before the list starts scrolling.
const MAX_VISIBLE_ROWS: usize = 30;

/// Arrow keys + Enter to pick, Esc or `q` to cancel.
pub struct TerminalPicker {
    term: Term,
    theme: ColorfulTheme,
}

impl TerminalPicker {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chooser for TerminalPicker {
    fn choose(&mut self, keyword: &str, choices: &[MethodTarget]) -> Result<Option<usize>> {
        let items: Vec<String> = choices
            .iter()
            .enumerate()
            .map(|(i, c)| format_choice(i, c))
            .collect();
        Select::with_theme(&self.theme)
            .with_prompt(format!("Select class for method {}", keyword))
            .items(&items)
            .default(0)
            .max_length(MAX_VISIBLE_ROWS)
            .interact_on_opt(&self.term)
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

/// Display row, numbered from 1.
fn format_choice(index: usize, choice: &MethodTarget) -> String {
    format!("{:>2}. {}", index + 1, choice.class_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_numbered_from_one() {
        let target = MethodTarget {
            class_name: "ofImage".into(),
            relative_url: "graphics/ofImage.html#show_draw".into(),
        };
        assert_eq!(format_choice(0, &target), " 1. ofImage");
        assert_eq!(format_choice(11, &target), "12. ofImage");
    }
}
