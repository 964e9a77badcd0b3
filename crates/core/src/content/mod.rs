//! Content normalization and acquisition.

pub mod normalize;
pub mod source;

pub use normalize::{normalize_record, ContentError};
pub use source::{read_record, ContentSource, FileSource};
