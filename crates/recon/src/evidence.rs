use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ReconSummary, ReconciledLink};
use crate::source::SourceBatch;

/// Compute summary statistics for one run.
pub fn compute_summary(
    batches: &[SourceBatch],
    links: &[ReconciledLink],
    skipped_malformed: usize,
    slug_conflicts: usize,
) -> ReconSummary {
    let mut source_records: BTreeMap<String, usize> = BTreeMap::new();
    for batch in batches {
        *source_records.entry(batch.name.clone()).or_insert(0) += batch.links.len();
    }
    let input_records: usize = source_records.values().sum();

    let mut method_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut rors: BTreeSet<&str> = BTreeSet::new();
    for link in links {
        rors.insert(&link.ror_id);
        for method in &link.extraction_methods {
            *method_counts.entry(method.clone()).or_insert(0) += 1;
        }
    }

    ReconSummary {
        input_records,
        links: links.len(),
        distinct_rors: rors.len(),
        merged_duplicates: input_records - skipped_malformed - links.len(),
        skipped_malformed,
        slug_conflicts,
        source_records,
        method_counts,
    }
}
