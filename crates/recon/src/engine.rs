use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::MalformedPolicy;
use crate::error::{ReconError, Result};
use crate::evidence::compute_summary;
use crate::model::{CandidateLink, IdentityKey, Reconciliation, ReconciledLink, SlugConflict};
use crate::source::SourceBatch;

/// Reconcile unnamed sources, aborting on the first malformed record.
///
/// Sources are named `source[i]` by position in error messages.
pub fn reconcile<S>(sources: &[S]) -> Result<Vec<ReconciledLink>>
where
    S: AsRef<[CandidateLink]>,
{
    let batches: Vec<SourceBatch> = sources
        .iter()
        .enumerate()
        .map(|(i, links)| SourceBatch::new(format!("source[{i}]"), links.as_ref().to_vec()))
        .collect();
    Ok(run(&batches, MalformedPolicy::Abort)?.links)
}

/// Run reconciliation over named source batches. Returns reconciled links in
/// identity-key order, plus summary and slug conflicts.
///
/// Under `MalformedPolicy::Abort` the first malformed record fails the whole
/// call and nothing is returned.
pub fn run(batches: &[SourceBatch], policy: MalformedPolicy) -> Result<Reconciliation> {
    let mut accumulators: BTreeMap<IdentityKey, Accumulator> = BTreeMap::new();
    let mut conflicts = Vec::new();
    let mut skipped = 0;

    for batch in batches {
        for (index, link) in batch.links.iter().enumerate() {
            if let Err(defect) = link.check() {
                match policy {
                    MalformedPolicy::Abort => {
                        return Err(ReconError::MalformedRecord {
                            origin: batch.name.clone(),
                            index,
                            defect,
                        });
                    }
                    MalformedPolicy::Skip => {
                        tracing::warn!(source = %batch.name, index, %defect, "skipping malformed record");
                        skipped += 1;
                        continue;
                    }
                }
            }

            let key = link.identity_key();
            match accumulators.entry(key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Accumulator::new(link));
                }
                Entry::Occupied(mut slot) => {
                    let acc = slot.get_mut();
                    acc.extraction_methods.insert(link.extraction_method.clone());
                    if let Some(dropped) = acc.conflicting_slug(&link.github_slug) {
                        let conflict = SlugConflict {
                            identity_key: key,
                            kept: acc.github_slug.clone(),
                            dropped,
                            source: batch.name.clone(),
                        };
                        tracing::warn!(
                            key = %conflict.identity_key,
                            kept = %conflict.kept,
                            dropped = %conflict.dropped,
                            source = %conflict.source,
                            "conflicting github slug for identity; keeping first"
                        );
                        conflicts.push(conflict);
                    }
                }
            }
        }
    }

    // BTreeMap iteration is already ascending by identity key.
    let links: Vec<ReconciledLink> = accumulators.into_values().map(Accumulator::finish).collect();
    conflicts.sort_by(|a, b| {
        a.identity_key
            .cmp(&b.identity_key)
            .then_with(|| a.dropped.cmp(&b.dropped))
    });

    let summary = compute_summary(batches, &links, skipped, conflicts.len());
    tracing::info!(
        input_records = summary.input_records,
        links = summary.links,
        distinct_rors = summary.distinct_rors,
        skipped = summary.skipped_malformed,
        "reconciled sources"
    );

    Ok(Reconciliation { links, summary, conflicts })
}

struct Accumulator {
    software_name: String,
    github_slug: String,
    ror_id: String,
    extraction_methods: BTreeSet<String>,
    /// Lower-cased slugs already reported as conflicts for this key.
    dropped_slugs: BTreeSet<String>,
}

impl Accumulator {
    fn new(link: &CandidateLink) -> Self {
        Self {
            software_name: link.software_name.trim().to_string(),
            github_slug: link.github_slug.clone(),
            ror_id: link.ror_id.clone(),
            extraction_methods: BTreeSet::from([link.extraction_method.clone()]),
            dropped_slugs: BTreeSet::new(),
        }
    }

    /// Returns the incoming slug if it differs from the kept one and has not
    /// been reported for this key yet.
    fn conflicting_slug(&mut self, slug: &str) -> Option<String> {
        let folded = slug.to_lowercase();
        if self.github_slug.to_lowercase() == folded {
            return None;
        }
        if self.dropped_slugs.insert(folded) {
            Some(slug.to_string())
        } else {
            None
        }
    }

    fn finish(self) -> ReconciledLink {
        ReconciledLink {
            software_name: self.software_name,
            github_slug: self.github_slug,
            ror_id: self.ror_id,
            extraction_methods: self.extraction_methods,
        }
    }
}
