use std::path::PathBuf;

use ossror_recon::{CandidateLink, CandidateSource};

use super::{field, for_each_row, open_table, Collector, SourceSettings};
use crate::error::SourceError;
use crate::slug::github_slug;

/// Software mentions joined to the ROR ids of their authors' affiliations
/// (CZI mentions, JOSS papers via OpenAlex). The same format feeds several
/// datasets, so the tag always comes from config.
pub struct AffiliationSource {
    settings: SourceSettings,
    file: PathBuf,
    delimiter: u8,
}

impl AffiliationSource {
    pub fn new(settings: SourceSettings, file: PathBuf, delimiter: u8) -> Self {
        Self { settings, file, delimiter }
    }
}

/// Upstream joins write `NA` for unmatched institutions.
fn is_missing_ror(value: &str) -> bool {
    value.is_empty() || value == "NA"
}

impl CandidateSource for AffiliationSource {
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
            &["software_name", "gh_repo", "institution_ror"],
        )?;

        let mut collector = Collector::new(&self.settings);
        for_each_row(origin, &mut reader, |line, record| {
            let ror_id = field(record, idx[2]);
            let slug = github_slug(field(record, idx[1]));
            match slug {
                Some(slug) if !is_missing_ror(ror_id) => collector.push(
                    line,
                    CandidateLink::new(field(record, idx[0]), slug, ror_id, self.settings.tag.as_str()),
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
