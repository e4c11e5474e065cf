use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LinkDefect;
use crate::TAG_SEPARATOR;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One single-source observation that a piece of software belongs to an
/// organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLink {
    pub software_name: String,
    pub github_slug: String,
    pub ror_id: String,
    pub extraction_method: String,
}

impl CandidateLink {
    /// Build a validated link. `software_name` is trimmed; every field must
    /// be non-empty and the tag must not contain the flattening separator.
    pub fn new(
        software_name: impl Into<String>,
        github_slug: impl Into<String>,
        ror_id: impl Into<String>,
        extraction_method: impl Into<String>,
    ) -> Result<Self, LinkDefect> {
        let link = Self {
            software_name: software_name.into().trim().to_string(),
            github_slug: github_slug.into(),
            ror_id: ror_id.into(),
            extraction_method: extraction_method.into(),
        };
        link.check()?;
        Ok(link)
    }

    /// Check the field contract without constructing anything.
    pub fn check(&self) -> Result<(), LinkDefect> {
        let fields = [
            ("software_name", &self.software_name),
            ("github_slug", &self.github_slug),
            ("ror_id", &self.ror_id),
            ("extraction_method", &self.extraction_method),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(LinkDefect::MissingField(name));
            }
        }
        if self.extraction_method.contains(TAG_SEPARATOR) {
            return Err(LinkDefect::SeparatorInTag(self.extraction_method.clone()));
        }
        Ok(())
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.software_name, &self.ror_id)
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Lower-cased `"{software_name}/{ror_id}"`. Ordering on this key is the
/// output ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(software_name: &str, ror_id: &str) -> Self {
        Self(format!("{}/{}", software_name.trim(), ror_id).to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Deduplicated link with the union of evidence from every source that
/// reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledLink {
    pub software_name: String,
    pub github_slug: String,
    pub ror_id: String,
    pub extraction_methods: BTreeSet<String>,
}

impl ReconciledLink {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.software_name, &self.ror_id)
    }

    /// Evidence tags joined with `;`, in ascending order.
    pub fn joined_methods(&self) -> String {
        let tags: Vec<&str> = self.extraction_methods.iter().map(String::as_str).collect();
        tags.join(TAG_SEPARATOR)
    }
}

/// Two records shared an identity key but named different repositories.
/// The first slug wins; the dropped one is recorded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugConflict {
    pub identity_key: IdentityKey,
    pub kept: String,
    pub dropped: String,
    pub source: String,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub input_records: usize,
    pub links: usize,
    pub distinct_rors: usize,
    pub merged_duplicates: usize,
    pub skipped_malformed: usize,
    pub slug_conflicts: usize,
    pub source_records: BTreeMap<String, usize>,
    pub method_counts: BTreeMap<String, usize>,
}

/// Everything one engine run produces.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub links: Vec<ReconciledLink>,
    pub summary: ReconSummary,
    pub conflicts: Vec<SlugConflict>,
}

impl Reconciliation {
    /// Machine-readable report for `--json` output. Links are written by the
    /// projectors, not here.
    pub fn report(&self, pipeline_name: &str) -> RunReport {
        RunReport {
            meta: ReconMeta {
                pipeline_name: pipeline_name.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            summary: self.summary.clone(),
            conflicts: self.conflicts.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub conflicts: Vec<SlugConflict>,
}

impl RunReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub pipeline_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_software_name() {
        let link = CandidateLink::new("  Foo  ", "a/foo", "R1", "m1").unwrap();
        assert_eq!(link.software_name, "Foo");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert_eq!(
            CandidateLink::new("   ", "a/foo", "R1", "m1").unwrap_err(),
            LinkDefect::MissingField("software_name")
        );
        assert_eq!(
            CandidateLink::new("Foo", "", "R1", "m1").unwrap_err(),
            LinkDefect::MissingField("github_slug")
        );
        assert_eq!(
            CandidateLink::new("Foo", "a/foo", "", "m1").unwrap_err(),
            LinkDefect::MissingField("ror_id")
        );
        assert_eq!(
            CandidateLink::new("Foo", "a/foo", "R1", " ").unwrap_err(),
            LinkDefect::MissingField("extraction_method")
        );
    }

    #[test]
    fn new_rejects_separator_in_tag() {
        let err = CandidateLink::new("Foo", "a/foo", "R1", "m1;m2").unwrap_err();
        assert_eq!(err, LinkDefect::SeparatorInTag("m1;m2".into()));
    }

    #[test]
    fn identity_key_ignores_case_and_padding() {
        assert_eq!(IdentityKey::new("  Foo ", "R1"), IdentityKey::new("foo", "r1"));
        assert_eq!(IdentityKey::new("Foo", "R1").as_str(), "foo/r1");
    }

    #[test]
    fn joined_methods_sorted() {
        let link = ReconciledLink {
            software_name: "Foo".into(),
            github_slug: "a/foo".into(),
            ror_id: "R1".into(),
            extraction_methods: ["url_matches", "human_curated", "by_name"]
                .into_iter()
                .map(String::from)
                .collect(),
        };
        assert_eq!(link.joined_methods(), "by_name;human_curated;url_matches");
    }

    #[test]
    fn report_serializes_summary_and_conflicts() {
        let recon = Reconciliation {
            links: vec![],
            summary: ReconSummary { input_records: 2, links: 1, ..Default::default() },
            conflicts: vec![SlugConflict {
                identity_key: IdentityKey::new("Foo", "R1"),
                kept: "a/foo".into(),
                dropped: "b/foo".into(),
                source: "curated".into(),
            }],
        };
        let json = recon.report("test").to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["meta"]["pipeline_name"], "test");
        assert_eq!(value["summary"]["input_records"], 2);
        assert_eq!(value["conflicts"][0]["identity_key"], "foo/r1");
        assert_eq!(value["conflicts"][0]["dropped"], "b/foo");
    }
}
