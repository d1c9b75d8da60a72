//! `key=value` marker parsing.
//!
//! Blank lines and `#` comments are ignored. `type` is the only key; its value
//! must be one of the accepted categories. A marker without a `type` line parses
//! to `None`.

use std::fs;
use std::path::Path;

use crate::errors::MarkerError;

/// Read and parse the marker at `path`.
pub fn parse_marker_file<S: AsRef<str>>(
    path: &Path,
    accepted: &[S],
) -> Result<Option<String>, MarkerError> {
    let text = fs::read_to_string(path).map_err(|source| MarkerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_marker_str(&text, accepted)
}

/// Parse marker contents. Returns the declared category, if any.
pub fn parse_marker_str<S: AsRef<str>>(
    text: &str,
    accepted: &[S],
) -> Result<Option<String>, MarkerError> {
    let mut category = None;
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(MarkerError::Malformed {
                line: idx + 1,
                text: line.to_string(),
            });
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "type" => {
                if !accepted.iter().any(|a| a.as_ref() == value) {
                    return Err(MarkerError::NotAccepted {
                        line: idx + 1,
                        value: value.to_string(),
                    });
                }
                // Later lines win.
                category = Some(value.to_string());
            }
            other => {
                return Err(MarkerError::UnknownKey {
                    line: idx + 1,
                    key: other.to_string(),
                });
            }
        }
    }
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPTED: &[&str] = &["go", "rust"];

    #[test]
    fn reads_type_skipping_comments_and_blanks() {
        let text = "# project marker\n\n   type = rust  \r\n";
        assert_eq!(parse_marker_str(text, ACCEPTED).unwrap().as_deref(), Some("rust"));
    }

    #[test]
    fn empty_marker_has_no_category() {
        assert_eq!(parse_marker_str("# nothing\n", ACCEPTED).unwrap(), None);
    }

    #[test]
    fn value_may_contain_equals() {
        let err = parse_marker_str("type=go=1", ACCEPTED).unwrap_err();
        assert!(matches!(err, MarkerError::NotAccepted { ref value, .. } if value == "go=1"));
    }

    #[test]
    fn reports_line_numbers() {
        let err = parse_marker_str("type=go\njunk", ACCEPTED).unwrap_err();
        assert!(matches!(err, MarkerError::Malformed { line: 2, .. }));

        let err = parse_marker_str("\nname=x", ACCEPTED).unwrap_err();
        assert!(matches!(err, MarkerError::UnknownKey { line: 2, ref key } if key == "name"));
    }

    #[test]
    fn category_match_is_case_sensitive() {
        assert!(matches!(
            parse_marker_str("type=Go", ACCEPTED),
            Err(MarkerError::NotAccepted { line: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = parse_marker_file(Path::new("/definitely/not/here/.filesort"), ACCEPTED)
            .unwrap_err();
        assert!(matches!(err, MarkerError::Read { .. }));
    }
}
