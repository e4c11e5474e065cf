//! File adapters producing `CandidateLink`s.
//!
//! Each adapter owns one upstream file format and emits records in the
//! common schema. Shared rules:
//! - rows without a ROR id or a linkable repository are dropped here and
//!   never reach the engine (counted at `debug`)
//! - any other defect (empty software name, tag containing `;`) follows the
//!   pipeline's `on_malformed` policy
//! - a missing header column fails the whole source

mod affiliation;
mod curated;
mod joss;
mod ner;
mod openaire;
mod url_matches;

use std::io::BufRead;
use std::path::Path;

use ossror_recon::{
    CandidateLink, CandidateSource, LinkDefect, MalformedPolicy, PipelineConfig, SourceBatch, SourceConfig,
    SourceKind,
};

use crate::error::SourceError;
use crate::reader::{default_delimiter, open_text};

pub use affiliation::AffiliationSource;
pub use curated::CuratedSource;
pub use joss::JossSource;
pub use ner::NerSource;
pub use openaire::OpenaireCziSource;
pub use url_matches::UrlMatchesSource;

pub type BoxedSource = Box<dyn CandidateSource<Error = SourceError>>;

/// Settings every adapter shares.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub name: String,
    pub tag: String,
    pub on_malformed: MalformedPolicy,
}

/// Build the adapter for one configured source. Relative paths resolve
/// against `base_dir`.
pub fn open_source(
    config: &SourceConfig,
    base_dir: &Path,
    on_malformed: MalformedPolicy,
) -> BoxedSource {
    let settings = SourceSettings {
        name: config.name.clone(),
        // Validated config always has a tag; affiliation without one is rejected there.
        tag: config.evidence_tag().unwrap_or_default().to_string(),
        on_malformed,
    };
    let file = base_dir.join(&config.file);
    let delimiter = config
        .delimiter_byte()
        .unwrap_or_else(|| default_delimiter(&file));

    match config.kind {
        SourceKind::UrlMatches => {
            let org_map = base_dir.join(config.org_map.as_deref().unwrap_or_default());
            Box::new(UrlMatchesSource::new(settings, file, org_map))
        }
        SourceKind::NerTextExtraction => Box::new(NerSource::new(settings, file, delimiter)),
        SourceKind::HumanCurated => Box::new(CuratedSource::new(settings, file, delimiter)),
        SourceKind::Affiliation => Box::new(AffiliationSource::new(settings, file, delimiter)),
        SourceKind::Joss => Box::new(JossSource::new(settings, file)),
        SourceKind::OpenaireCzi => {
            // OpenAIRE x CZI joins are written as TSV regardless of extension.
            let delimiter = config.delimiter_byte().unwrap_or(b'\t');
            Box::new(OpenaireCziSource::new(settings, file, delimiter))
        }
    }
}

/// Load every configured source, in config order.
pub fn load_all(config: &PipelineConfig, base_dir: &Path) -> Result<Vec<SourceBatch>, SourceError> {
    config
        .sources
        .iter()
        .map(|source| {
            let adapter = open_source(source, base_dir, config.on_malformed);
            SourceBatch::load(adapter.as_ref())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Shared adapter plumbing
// ---------------------------------------------------------------------------

/// Accumulates one source's links while applying the drop/skip rules.
pub(crate) struct Collector<'a> {
    settings: &'a SourceSettings,
    links: Vec<CandidateLink>,
    unlinked: usize,
    skipped: usize,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(settings: &'a SourceSettings) -> Self {
        Self { settings, links: Vec::new(), unlinked: 0, skipped: 0 }
    }

    /// Row has no ROR id or repository; adapters drop these silently.
    pub(crate) fn unlinked(&mut self) {
        self.unlinked += 1;
    }

    pub(crate) fn push(&mut self, line: u64, link: Result<CandidateLink, LinkDefect>) -> Result<(), SourceError> {
        match link {
            Ok(link) => self.links.push(link),
            Err(defect) => match self.settings.on_malformed {
                MalformedPolicy::Abort => {
                    return Err(SourceError::Record {
                        origin: self.settings.name.clone(),
                        line,
                        defect,
                    });
                }
                MalformedPolicy::Skip => {
                    tracing::warn!(source = %self.settings.name, line, %defect, "skipping malformed row");
                    self.skipped += 1;
                }
            },
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<CandidateLink> {
        tracing::debug!(
            source = %self.settings.name,
            links = self.links.len(),
            unlinked = self.unlinked,
            skipped = self.skipped,
            "adapter finished"
        );
        self.links
    }
}

/// Open a delimited file and resolve the named columns, in order.
pub(crate) fn open_table(
    origin: &str,
    path: &Path,
    delimiter: u8,
    columns: &[&str],
) -> Result<(csv::Reader<Box<dyn BufRead>>, Vec<usize>), SourceError> {
    let input = open_text(path).map_err(|e| SourceError::Io {
        origin: origin.into(),
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| SourceError::Csv { origin: origin.into(), source: e })?
        .clone();

    let indices = columns
        .iter()
        .map(|name| {
            headers.iter().position(|h| h.trim() == *name).ok_or_else(|| SourceError::MissingColumn {
                origin: origin.into(),
                column: (*name).into(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((reader, indices))
}

/// Iterate a table's rows with their 1-based line numbers.
pub(crate) fn for_each_row<F>(
    origin: &str,
    reader: &mut csv::Reader<Box<dyn BufRead>>,
    mut f: F,
) -> Result<(), SourceError>
where
    F: FnMut(u64, &csv::StringRecord) -> Result<(), SourceError>,
{
    for record in reader.records() {
        let record = record.map_err(|e| SourceError::Csv { origin: origin.into(), source: e })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        f(line, &record)?;
    }
    Ok(())
}

/// Field value, trimmed; missing trailing fields read as empty.
pub(crate) fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

/// Iterate non-blank JSON lines with their 1-based line numbers.
pub(crate) fn for_each_json_line<T, F>(origin: &str, path: &Path, mut f: F) -> Result<(), SourceError>
where
    T: serde::de::DeserializeOwned,
    F: FnMut(u64, T) -> Result<(), SourceError>,
{
    let input = open_text(path).map_err(|e| SourceError::Io {
        origin: origin.into(),
        path: path.to_path_buf(),
        source: e,
    })?;
    for (i, line) in input.lines().enumerate() {
        let line_no = i as u64 + 1;
        let line = line.map_err(|e| SourceError::Io {
            origin: origin.into(),
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let value: T = serde_json::from_str(&line).map_err(|e| SourceError::Json {
            origin: origin.into(),
            line: line_no,
            source: e,
        })?;
        f(line_no, value)?;
    }
    Ok(())
}
