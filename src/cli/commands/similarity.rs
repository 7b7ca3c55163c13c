//! Diff similarity CLI command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::cli::output::{output, CommandOutput};
use crate::services::similarity::{edit_similarity, normalize_diff};

#[derive(Args, Debug)]
pub struct SimilarityArgs {
    /// First diff file
    pub left: PathBuf,

    /// Second diff file
    pub right: PathBuf,

    /// Compare raw text instead of normalized diffs
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct SimilarityOutput {
    pub left: String,
    pub right: String,
    pub normalized: bool,
    pub similarity: f64,
}

impl CommandOutput for SimilarityOutput {
    fn to_human(&self) -> String {
        format!(
            "{} vs {}: {:.4}{}",
            self.left,
            self.right,
            self.similarity,
            if self.normalized { "" } else { " (raw)" }
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn read_diff(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn run(args: &SimilarityArgs) -> Result<SimilarityOutput> {
    let mut left = read_diff(&args.left)?;
    let mut right = read_diff(&args.right)?;
    if !args.raw {
        left = normalize_diff(&left);
        right = normalize_diff(&right);
    }

    Ok(SimilarityOutput {
        left: args.left.display().to_string(),
        right: args.right.display().to_string(),
        normalized: !args.raw,
        similarity: edit_similarity(&left, &right),
    })
}

pub fn execute(args: &SimilarityArgs, json_mode: bool) -> Result<()> {
    let result = run(args)?;
    output(&result, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn diff_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_normalized_comparison_ignores_markers() {
        let left = diff_file("- a == b\n");
        let right = diff_file("+   a == b\n\n");
        let args = SimilarityArgs {
            left: left.path().to_path_buf(),
            right: right.path().to_path_buf(),
            raw: false,
        };

        let result = run(&args).unwrap();
        assert!((result.similarity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_raw_comparison_sees_markers() {
        let left = diff_file("- a == b\n");
        let right = diff_file("+ a == b\n");
        let args = SimilarityArgs {
            left: left.path().to_path_buf(),
            right: right.path().to_path_buf(),
            raw: true,
        };

        let result = run(&args).unwrap();
        assert!(result.similarity < 1.0);
        assert!(result.to_human().ends_with("(raw)"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let args = SimilarityArgs {
            left: PathBuf::from("/nonexistent/left.diff"),
            right: PathBuf::from("/nonexistent/right.diff"),
            raw: false,
        };
        assert!(run(&args).is_err());
    }
}
