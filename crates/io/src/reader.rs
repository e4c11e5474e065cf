//! Opening source files. `.gz` files are decompressed on the fly so
//! compressed dumps can be read without unpacking them first.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

/// Open a file for buffered reading, transparently gunzipping `*.gz`.
pub fn open_text(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzip(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Tab for `*.tsv` / `*.tsv.gz`, comma otherwise.
pub fn default_delimiter(path: &Path) -> u8 {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") {
        b'\t'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::tempdir;

    #[test]
    fn reads_plain_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut content = String::new();
        open_text(&path).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "a,b\n1,2\n");
    }

    #[test]
    fn reads_gzip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"a\tb\n1\t2\n").unwrap();
        encoder.finish().unwrap();

        let mut content = String::new();
        open_text(&path).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "a\tb\n1\t2\n");
    }

    #[test]
    fn delimiter_from_extension() {
        assert_eq!(default_delimiter(Path::new("x.tsv")), b'\t');
        assert_eq!(default_delimiter(Path::new("x.TSV.gz")), b'\t');
        assert_eq!(default_delimiter(Path::new("x.csv")), b',');
        assert_eq!(default_delimiter(Path::new("x.csv.gz")), b',');
    }
}
