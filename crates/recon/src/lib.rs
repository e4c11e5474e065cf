//! `ossror-recon`: multi-source software-to-ROR link reconciliation.
//!
//! Pure engine crate: receives candidate links already produced by source
//! adapters, returns deduplicated links with merged evidence. No file IO.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod model;
pub mod source;

pub use config::{MalformedPolicy, PipelineConfig, SourceConfig, SourceKind};
pub use engine::{reconcile, run};
pub use error::{LinkDefect, ReconError};
pub use model::{CandidateLink, IdentityKey, Reconciliation, ReconciledLink, RunReport, SlugConflict};
pub use source::{CandidateSource, SourceBatch};

/// Separator used when evidence tags are flattened into a single field.
pub const TAG_SEPARATOR: &str = ";";
