use std::path::PathBuf;

use serde::Deserialize;

use ossror_recon::{CandidateLink, CandidateSource};

use super::{for_each_json_line, Collector, SourceSettings};
use crate::error::SourceError;
use crate::slug::github_slug;

/// JOSS paper affiliations, one JSON object per line. `github_slug` holds
/// the repository URL as printed on the paper page.
pub struct JossSource {
    settings: SourceSettings,
    file: PathBuf,
}

#[derive(Deserialize)]
struct JossRow {
    #[serde(default)]
    software_name: String,
    #[serde(default)]
    github_slug: String,
    #[serde(default)]
    ror_id: String,
}

impl JossSource {
    pub fn new(settings: SourceSettings, file: PathBuf) -> Self {
        Self { settings, file }
    }
}

impl CandidateSource for JossSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        &self.settings.name
    }

    fn load(&self) -> Result<Vec<CandidateLink>, SourceError> {
        let mut collector = Collector::new(&self.settings);
        for_each_json_line(&self.settings.name, &self.file, |line, row: JossRow| {
            let ror_id = row.ror_id.trim();
            match github_slug(&row.github_slug) {
                Some(slug) if !ror_id.is_empty() => collector.push(
                    line,
                    CandidateLink::new(row.software_name, slug, ror_id, self.settings.tag.as_str()),
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
