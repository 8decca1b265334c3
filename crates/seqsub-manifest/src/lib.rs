//! Manifest reading engine for submission types.
//!
//! A manifest is either a line-oriented key/value file or a single JSON
//! object; both serialize into the same [`seqsub_schema::FieldValue`]
//! occurrences, so validation never branches on the source format. The
//! engine parses, expands referenced info files, then runs the validation
//! passes in a fixed order, accumulating every finding instead of failing
//! fast.

mod json;
mod parse;
mod processors;
mod reader;
mod validate;

pub use parse::{detect_format, Format};
pub use processors::{
    parse_bool, AsciiFileNameProcessor, BooleanProcessor, CvProcessor, FileSuffixProcessor,
    PositiveFloatProcessor, PositiveIntegerProcessor,
};
pub use reader::{ManifestReader, ManifestReaderResult, SubmissionReader};
