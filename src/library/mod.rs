//! Episode library: the files that become feed items.
//!
//! - `scan`: list, filter, and order media files
//! - `tags`: read episode titles from embedded tags

pub mod scan;
pub mod tags;

pub use scan::{FileEntry, collect_files, sort_newest_first};
pub use tags::{LoftyReader, TagError, TitleReader};
