//! Guards run before the CLI writes anything.
//!
//! Parsed output is always JSON, so anything else as an output name is treated
//! as a typo. Outputs are also compared against every lyric and translation
//! input, resolved through symlinks where the files exist.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

fn resolved(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Reject an output path that is not `.json` or that points at one of `inputs`.
pub fn validate_output_path(output: &Path, inputs: &[&Path]) -> Result<()> {
    let is_json = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        bail!(
            "Refusing to write '{}': parsed lyrics must go to a .json file",
            output.display()
        );
    }

    let target = resolved(output);
    if let Some(input) = inputs.iter().find(|input| resolved(input) == target) {
        bail!(
            "Refusing to write '{}': it is the input file '{}'",
            output.display(),
            input.display()
        );
    }
    Ok(())
}

/// Reject a batch output directory that is the directory being scanned.
pub fn validate_output_dir(output_dir: &Path, input_dir: &Path) -> Result<()> {
    if resolved(output_dir) == resolved(input_dir) {
        bail!(
            "Refusing to write into '{}': output directory is the input directory",
            output_dir.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_accepted() {
        let source = Path::new("/data/song.lrc");
        assert!(validate_output_path(Path::new("/tmp/song.lyrics.json"), &[source]).is_ok());
        assert!(validate_output_path(Path::new("/tmp/SONG.JSON"), &[source]).is_ok());
    }

    #[test]
    fn test_non_json_rejected() {
        let err = validate_output_path(Path::new("/tmp/song.lrc"), &[Path::new("/data/a.lrc")])
            .unwrap_err();
        assert!(err.to_string().contains(".json file"));
    }

    #[test]
    fn test_input_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let lyric = dir.path().join("song.lrc");
        let translation = dir.path().join("song.json");
        std::fs::write(&lyric, "[00:01.00]x").unwrap();
        std::fs::write(&translation, "{}").unwrap();

        let err = validate_output_path(&translation, &[&lyric, &translation]).unwrap_err();
        assert!(err.to_string().contains("is the input file"));

        // Same file reached through a different spelling
        let dotted = dir.path().join(".").join("song.json");
        assert!(validate_output_path(&dotted, &[&translation]).is_err());
    }

    #[test]
    fn test_output_dir_same_as_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_dir(dir.path(), dir.path()).is_err());
        let out = dir.path().join("out");
        assert!(validate_output_dir(&out, dir.path()).is_ok());
    }
}
