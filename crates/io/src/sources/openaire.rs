use std::path::PathBuf;

use ossror_recon::{CandidateLink, CandidateSource};

use super::{field, for_each_row, open_table, Collector, SourceSettings};
use crate::error::SourceError;
use crate::slug::github_slug;

/// OpenAIRE DOI → ROR relations joined on DOI with CZI software mentions.
/// Tab-separated with columns `github_repo`, `software`, `RORid`.
pub struct OpenaireCziSource {
    settings: SourceSettings,
    file: PathBuf,
    delimiter: u8,
}

impl OpenaireCziSource {
    pub fn new(settings: SourceSettings, file: PathBuf, delimiter: u8) -> Self {
        Self { settings, file, delimiter }
    }
}

impl CandidateSource for OpenaireCziSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        &self.settings.name
    }

    fn load(&self) -> Result<Vec<CandidateLink>, SourceError> {
        let origin = &self.settings.name;
        let (mut reader, idx) =
            open_table(origin, &self.file, self.delimiter, &["github_repo", "software", "RORid"])?;

        let mut collector = Collector::new(&self.settings);
        for_each_row(origin, &mut reader, |line, record| {
            let ror_id = field(record, idx[2]);
            match github_slug(field(record, idx[0])) {
                Some(slug) if !ror_id.is_empty() => collector.push(
                    line,
                    CandidateLink::new(field(record, idx[1]), slug, ror_id, self.settings.tag.as_str()),
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
