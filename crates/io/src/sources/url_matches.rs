use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Deserialize;

use ossror_recon::{CandidateLink, CandidateSource};

use super::{for_each_json_line, Collector, SourceSettings};
use crate::error::SourceError;
use crate::reader::open_text;
use crate::slug::github_slug;

/// Repository metadata dump (one JSON object per line) joined with an
/// owner → ROR ids map found by matching owner URLs against ROR records.
///
/// Every distinct `owner/repo` yields one link per ROR id mapped to its
/// owner; the slug doubles as the software name.
pub struct UrlMatchesSource {
    settings: SourceSettings,
    repos: PathBuf,
    org_map: PathBuf,
}

#[derive(Deserialize)]
struct RepoMeta {
    owner_name: String,
    current_name: String,
}

impl UrlMatchesSource {
    pub fn new(settings: SourceSettings, repos: PathBuf, org_map: PathBuf) -> Self {
        Self { settings, repos, org_map }
    }

    fn read_org_map(&self) -> Result<BTreeMap<String, Vec<String>>, SourceError> {
        let input = open_text(&self.org_map).map_err(|e| SourceError::Io {
            origin: self.settings.name.clone(),
            path: self.org_map.clone(),
            source: e,
        })?;
        serde_json::from_reader(input).map_err(|e| SourceError::Json {
            origin: self.settings.name.clone(),
            line: e.line() as u64,
            source: e,
        })
    }
}

impl CandidateSource for UrlMatchesSource {
    type Error = SourceError;

    fn name(&self) -> &str {
        &self.settings.name
    }

    fn load(&self) -> Result<Vec<CandidateLink>, SourceError> {
        let origin = &self.settings.name;

        let mut owner_repos: BTreeMap<String, BTreeSet<(String, u64)>> = BTreeMap::new();
        for_each_json_line(origin, &self.repos, |line, meta: RepoMeta| {
            owner_repos
                .entry(meta.owner_name)
                .or_default()
                .insert((meta.current_name, line));
            Ok(())
        })?;

        let org_map = self.read_org_map()?;

        let mut collector = Collector::new(&self.settings);
        for (owner, repos) in &owner_repos {
            let Some(ror_ids) = org_map.get(owner) else {
                collector.unlinked();
                continue;
            };
            let mut seen = BTreeSet::new();
            for (repo, line) in repos {
                if !seen.insert(repo) {
                    continue;
                }
                let Some(slug) = github_slug(&format!("{owner}/{repo}")) else {
                    collector.unlinked();
                    continue;
                };
                for ror_id in ror_ids.iter().map(|r| r.trim()) {
                    if ror_id.is_empty() {
                        collector.unlinked();
                        continue;
                    }
                    collector.push(
                        *line,
                        CandidateLink::new(slug.as_str(), slug.as_str(), ror_id, self.settings.tag.as_str()),
                    )?;
                }
            }
        }
        Ok(collector.finish())
    }
}
