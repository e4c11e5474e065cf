//! Contract between source adapters and the engine.
//!
//! An adapter owns everything about its raw format (JSON lines, CSV,
//! compressed TSV). The engine only ever sees the `CandidateLink`s it emits,
//! after all of its IO has completed.

use crate::model::CandidateLink;

/// A producer of candidate links for one data source.
pub trait CandidateSource {
    type Error;

    /// Source name used in summaries and error messages.
    fn name(&self) -> &str;

    /// Read the source and return its candidate links, in any order.
    ///
    /// Rows without a ROR id or repository must be dropped here, not
    /// passed on to the engine.
    fn load(&self) -> Result<Vec<CandidateLink>, Self::Error>;
}

/// Candidate links from one source, tagged with the source name.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub name: String,
    pub links: Vec<CandidateLink>,
}

impl SourceBatch {
    pub fn new(name: impl Into<String>, links: Vec<CandidateLink>) -> Self {
        Self { name: name.into(), links }
    }

    /// Run an adapter and capture its output as a batch.
    pub fn load<S: CandidateSource + ?Sized>(source: &S) -> Result<Self, S::Error> {
        let links = source.load()?;
        tracing::debug!(source = source.name(), records = links.len(), "loaded source");
        Ok(Self::new(source.name(), links))
    }
}
