//! Hierarchical projection: links grouped by organization, then software.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use ossror_recon::ReconciledLink;

use crate::error::WriteError;

/// One software entry under an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leaf {
    pub github_slug: String,
    pub extraction_methods: String,
}

/// `ror_id` → `software_name` → leaf. Both levels iterate in key order.
pub type Hierarchy = BTreeMap<String, BTreeMap<String, Leaf>>;

/// Group already-reconciled links. Each link lands in exactly one leaf.
pub fn build_hierarchy(links: &[ReconciledLink]) -> Hierarchy {
    let mut tree = Hierarchy::new();
    for link in links {
        tree.entry(link.ror_id.clone()).or_default().insert(
            link.software_name.clone(),
            Leaf {
                github_slug: link.github_slug.clone(),
                extraction_methods: link.joined_methods(),
            },
        );
    }
    tree
}

pub fn write_hierarchical<W: Write>(links: &[ReconciledLink], mut writer: W) -> Result<(), WriteError> {
    serde_json::to_writer_pretty(&mut writer, &build_hierarchy(links))?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write the hierarchical projection to `path`, replacing any existing file.
pub fn export_hierarchical(links: &[ReconciledLink], path: &Path) -> Result<(), WriteError> {
    let file = File::create(path).map_err(|e| WriteError::Io { path: path.to_path_buf(), source: e })?;
    write_hierarchical(links, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(name: &str, slug: &str, ror: &str, methods: &[&str]) -> ReconciledLink {
        ReconciledLink {
            software_name: name.into(),
            github_slug: slug.into(),
            ror_id: ror.into(),
            extraction_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn groups_by_ror_then_name() {
        let links = vec![
            link("nasa/fprime", "nasa/fprime", "R-nasa", &["url_matches", "ner_text_extraction"]),
            link("nasa/openmct", "nasa/openmct", "R-nasa", &["by_name"]),
            link("scispacy", "allenai/scispacy", "R-ai2", &["human_curated"]),
        ];
        let tree = build_hierarchy(&links);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree["R-nasa"].len(), 2);
        assert_eq!(
            tree["R-nasa"]["nasa/fprime"],
            Leaf {
                github_slug: "nasa/fprime".into(),
                extraction_methods: "ner_text_extraction;url_matches".into(),
            }
        );
        assert_eq!(tree["R-ai2"]["scispacy"].github_slug, "allenai/scispacy");
    }

    #[test]
    fn leaf_count_matches_link_count() {
        let links: Vec<_> = (0..20)
            .map(|i| link(&format!("s{i}"), "o/s", &format!("R{}", i % 3), &["m"]))
            .collect();
        let tree = build_hierarchy(&links);
        let leaves: usize = tree.values().map(BTreeMap::len).sum();
        assert_eq!(leaves, links.len());
    }

    #[test]
    fn json_shape() {
        let links = vec![link("Foo", "a/foo", "R1", &["m2", "m1"])];
        let mut out = Vec::new();
        write_hierarchical(&links, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"R1": {"Foo": {"github_slug": "a/foo", "extraction_methods": "m1;m2"}}})
        );
    }

    #[test]
    fn empty_input_is_empty_object() {
        let mut out = Vec::new();
        write_hierarchical(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{}\n");
    }
}
