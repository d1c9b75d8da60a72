//! Category label -> single safe path component.
//!
//! Whitespace runs collapse to one space, the label is lowercased and trimmed,
//! characters that are invalid in Windows file names are dropped, and remaining
//! spaces become `_`. Anything that would not name a real child directory
//! (`""`, `.`, `..`) becomes `unknown`.

const INVALID: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
const FALLBACK: &str = "unknown";

pub fn sanitize(label: &str) -> String {
    let mut collapsed = String::with_capacity(label.len());
    let mut in_space = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
                in_space = true;
            }
        } else {
            collapsed.extend(c.to_lowercase());
            in_space = false;
        }
    }

    let out: String = collapsed
        .trim()
        .chars()
        .filter(|c| !INVALID.contains(c) && !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    match out.as_str() {
        "" | "." | ".." => FALLBACK.to_string(),
        _ => out,
    }
}
