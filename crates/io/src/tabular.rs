//! Tabular projection: one CSV row per reconciled link.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ossror_recon::ReconciledLink;

use crate::error::WriteError;
use crate::TABULAR_HEADER;

/// Write links as CSV, header first, rows in the order given. The header is
/// written even when there are no links.
pub fn write_tabular<W: Write>(links: &[ReconciledLink], writer: W) -> Result<(), WriteError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(TABULAR_HEADER)?;
    for link in links {
        let methods = link.joined_methods();
        wtr.write_record([
            link.software_name.as_str(),
            link.github_slug.as_str(),
            link.ror_id.as_str(),
            methods.as_str(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the tabular projection to `path`, replacing any existing file.
pub fn export_tabular(links: &[ReconciledLink], path: &Path) -> Result<(), WriteError> {
    let file = File::create(path).map_err(|e| WriteError::Io { path: path.to_path_buf(), source: e })?;
    write_tabular(links, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn link(name: &str, slug: &str, ror: &str, methods: &[&str]) -> ReconciledLink {
        ReconciledLink {
            software_name: name.into(),
            github_slug: slug.into(),
            ror_id: ror.into(),
            extraction_methods: methods.iter().map(|m| m.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let links = vec![
            link("nasa/fprime", "nasa/fprime", "https://ror.org/027ka1x80", &["url_matches", "ner_text_extraction"]),
            link("scispacy", "allenai/scispacy", "https://ror.org/05w520734", &["human_curated"]),
        ];
        let mut out = Vec::new();
        write_tabular(&links, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "software_name,github_slug,ror_id,extraction_methods\n\
             nasa/fprime,nasa/fprime,https://ror.org/027ka1x80,ner_text_extraction;url_matches\n\
             scispacy,allenai/scispacy,https://ror.org/05w520734,human_curated\n"
        );
    }

    #[test]
    fn empty_input_writes_header_only() {
        let mut out = Vec::new();
        write_tabular(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "software_name,github_slug,ror_id,extraction_methods\n");
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let links = vec![link("Foo, the tool", "a/foo", "R1", &["by_name"])];
        let mut out = Vec::new();
        write_tabular(&links, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().ends_with("\"Foo, the tool\",a/foo,R1,by_name\n"));
    }

    #[test]
    fn export_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_tabular(&[], &dir.path().join("missing").join("out.csv")).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }
}
