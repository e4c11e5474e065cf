use std::path::PathBuf;

use ossror_recon::{CandidateLink, CandidateSource};

use super::{field, for_each_row, open_table, Collector, SourceSettings};
use crate::error::SourceError;
use crate::slug::github_slug;

/// Organization mentions found by NER over repository READMEs, already
/// resolved to ROR ids. Rows the resolver could not match have an empty
/// `ror_id`.
pub struct NerSource {
    settings: SourceSettings,
    file: PathBuf,
    delimiter: u8,
}

impl NerSource {
    pub fn new(settings: SourceSettings, file: PathBuf, delimiter: u8) -> Self {
        Self { settings, file, delimiter }
    }
}

impl CandidateSource for NerSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        &self.settings.name
    }

    fn load(&self) -> Result<Vec<CandidateLink>, SourceError> {
        let origin = &self.settings.name;
        let (mut reader, idx) = open_table(origin, &self.file, self.delimiter, &["repo_name", "ror_id"])?;
        let (repo_idx, ror_idx) = (idx[0], idx[1]);

        let mut collector = Collector::new(&self.settings);
        for_each_row(origin, &mut reader, |line, record| {
            let ror_id = field(record, ror_idx);
            let slug = github_slug(field(record, repo_idx));
            match slug {
                Some(slug) if !ror_id.is_empty() => collector.push(
                    line,
                    CandidateLink::new(slug.as_str(), slug.as_str(), ror_id, self.settings.tag.as_str()),
                ),
                _ => {
                    collector.unlinked();
                    Ok(())
                }
            }
        })?;
        Ok(collector.finish())
    }
}
