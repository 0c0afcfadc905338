//! Input handling for expression arguments, files and stdin.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::Path;

/// Collect the invocations to process.
///
/// Positional expressions win; otherwise `--input` is read, otherwise stdin.
/// File and stdin input hold one invocation per line.
pub fn read_expressions(expressions: &[String], input: Option<&Path>) -> Result<Vec<String>> {
    if !expressions.is_empty() {
        return Ok(expressions.to_vec());
    }
    let content = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read from stdin")?;
            content
        }
    };
    Ok(split_lines(&content))
}

/// Split input into invocations, skipping blank lines and `--` comments.
fn split_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().trim_end_matches(';').trim())
        .filter(|line| !line.is_empty() && !line.starts_with("--"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_positional_expressions_win() {
        let exprs = vec!["count(*)".to_string()];
        let result = read_expressions(&exprs, Some(Path::new("/nonexistent"))).unwrap();
        assert_eq!(result, exprs);
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "-- aggregates").unwrap();
        writeln!(file, "sum(price);").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  upper(name)  ").unwrap();

        let result = read_expressions(&[], Some(file.path())).unwrap();
        assert_eq!(result, vec!["sum(price)", "upper(name)"]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_expressions(&[], Some(Path::new("/nonexistent/calls.sql"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
