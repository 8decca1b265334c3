//! Concrete submission types built on the shared manifest engine.
//!
//! Each reader is a thin schema declaration plus a `process` step that
//! projects a validated result into a typed manifest. All parsing,
//! cardinality, vocabulary, file-group and uniqueness rules come from
//! `seqsub-manifest`.

mod genome;
mod kind;
mod reads;
mod sequence;
mod transcriptome;
mod vocab;

pub use genome::{GenomeManifest, GenomeReader};
pub use kind::SubmissionKind;
pub use reads::{ReadsManifest, ReadsReader};
pub use sequence::{SequenceManifest, SequenceReader};
pub use transcriptome::{TranscriptomeManifest, TranscriptomeReader};
