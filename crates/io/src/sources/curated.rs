use std::path::PathBuf;

use ossror_recon::{CandidateLink, CandidateSource, TAG_SEPARATOR};

use super::{field, for_each_row, open_table, Collector, SourceSettings};
use crate::error::SourceError;

/// Hand-checked links. Each row carries its own evidence tags
/// (`human_curated`, `by_name`, ...) separated by `;`; an empty tag column
/// falls back to the source tag.
pub struct CuratedSource {
    settings: SourceSettings,
    file: PathBuf,
    delimiter: u8,
}

impl CuratedSource {
    pub fn new(settings: SourceSettings, file: PathBuf, delimiter: u8) -> Self {
        Self { settings, file, delimiter }
    }
}

impl CandidateSource for CuratedSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        &self.settings.name
    }

    fn load(&self) -> Result<Vec<CandidateLink>, SourceError> {
        let origin = &self.settings.name;
        let (mut reader, idx) = open_table(
            origin,
            &self.file,
            self.delimiter,
            &["software_name", "github_slug", "ror_id", "extraction_methods"],
        )?;

        let mut collector = Collector::new(&self.settings);
        for_each_row(origin, &mut reader, |line, record| {
            let software_name = field(record, idx[0]);
            let slug = field(record, idx[1]);
            let ror_id = field(record, idx[2]);
            if slug.is_empty() || ror_id.is_empty() {
                collector.unlinked();
                return Ok(());
            }

            let mut tags: Vec<&str> = field(record, idx[3])
                .split(TAG_SEPARATOR)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();
            if tags.is_empty() {
                tags.push(&self.settings.tag);
            }
            for tag in tags {
                collector.push(line, CandidateLink::new(software_name, slug, ror_id, tag))?;
            }
            Ok(())
        })?;
        Ok(collector.finish())
    }
}
