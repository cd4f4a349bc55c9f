//! ofdoc — jump from an openFrameworks name to its documentation page.
//!
//! Two independent phases share this library:
//!
//! - **indexing** (`ofdoc-index`): convert the documentation sources to HTML,
//!   read each page's table of contents and write flat keyword index files.
//! - **resolution** (`ofdoc-open`): look a keyword up in those files and open
//!   the matching page, asking the user when a method name is ambiguous.

pub mod browser;
pub mod config;
pub mod convert;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod model;
pub mod page;
pub mod picker;
pub mod resolver;
pub mod store;
pub mod toc;

pub use error::{Error, Result};
