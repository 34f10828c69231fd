//! weblog access - path confinement, directory listing and log retrieval
//!
//! Everything that touches the filesystem on behalf of a user goes through
//! [`PathResolver::resolve`] first.

mod accessor;
pub mod breadcrumbs;
pub mod lister;
mod page;
mod reader;
mod resolver;

pub use accessor::{download_filename, LogAccessor, LogView};
pub use page::{Browser, PageKind, PageOutcome, PageRequest, SCOPE_SET_MESSAGE};
pub use reader::LogReader;
pub use resolver::PathResolver;
