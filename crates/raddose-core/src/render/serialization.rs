use std::fs;
use std::path::Path;

/// Converts CRLF and bare CR to LF and guarantees a trailing newline.
pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

#[cfg(test)]
mod tests {
    use super::{normalize_text_artifact, write_text_artifact};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn normalize_text_artifact_uses_canonical_line_endings() {
        assert_eq!(
            normalize_text_artifact("Crystal\r\nType Cuboid\rDimensions 10"),
            "Crystal\nType Cuboid\nDimensions 10\n"
        );
        assert_eq!(normalize_text_artifact(""), "");
    }

    #[test]
    fn repeated_text_writes_produce_identical_bytes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("sample.txt");
        let input = "Beam\r\nType TopHat";

        write_text_artifact(&path, input).expect("first write should succeed");
        let first = fs::read(&path).expect("input file should be readable");

        write_text_artifact(&path, input).expect("second write should succeed");
        let second = fs::read(&path).expect("input file should be readable");

        assert_eq!(first, second);
        assert_eq!(second, b"Beam\nType TopHat\n");
    }
}
