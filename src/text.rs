//! Text helpers: slug coercion, case conversion and the "must be ..."
//! phrasing shared by every validator message.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").unwrap());

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\s,/+&\\?=_.<>{}:;'"*$#~!@|\]\[`()^%-]+"#).unwrap());

static TRAILING_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+$").unwrap());

/// Coerce free text into slug form.
///
/// Leading digits are prefixed with `n`, runs of separators collapse to a
/// single `-`, trailing dashes are dropped and the result is lowercased.
///
/// ```
/// use build_block::text::slugify;
///
/// assert_eq!(slugify("Test Namespace"), "test-namespace");
/// assert_eq!(slugify("  42 Things!! "), "n42-things");
/// ```
pub fn slugify(input: &str) -> String {
    let trimmed = input.trim();
    let prefixed = LEADING_DIGITS.replace(trimmed, "n$0");
    let dashed = SEPARATORS.replace_all(&prefixed, "-");
    TRAILING_DASHES.replace(&dashed, "").to_lowercase()
}

/// Convert kebab-case (or any slugifiable text) into PascalCase.
pub fn kebab_to_pascal(input: &str) -> String {
    slugify(input)
        .split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

/// Uppercase the first character.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Phrase a requirement as `must be <what>`.
pub fn must_be(what: impl AsRef<str>) -> String {
    format!("must be {}", what.as_ref()).trim().to_string()
}

/// Phrase a prohibition as `must not be <what>`.
pub fn must_not_be(what: impl AsRef<str>) -> String {
    format!("must not be {}", what.as_ref()).trim().to_string()
}

/// Phrase a structural requirement as `must have <what>`.
pub fn must_have(what: impl AsRef<str>) -> String {
    format!("must have {}", what.as_ref()).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_separators_and_case() {
        assert_eq!(slugify("Test Slug"), "test-slug");
        assert_eq!(slugify("My_Plugin.Name"), "my-plugin-name");
        assert_eq!(slugify("a  --  b"), "a-b");
        assert_eq!(slugify("trailing!!!"), "trailing");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
    }

    #[test]
    fn test_slugify_leading_digits() {
        assert_eq!(slugify("3d viewer"), "n3d-viewer");
        assert_eq!(slugify("v2 block"), "v2-block");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in ["Test Namespace", "  x & y  ", "n1-abc", "A/B/C"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn test_kebab_to_pascal() {
        assert_eq!(kebab_to_pascal("awesome-block"), "AwesomeBlock");
        assert_eq!(kebab_to_pascal("an-example-string"), "AnExampleString");
        assert_eq!(kebab_to_pascal("Already Spaced"), "AlreadySpaced");
        assert_eq!(kebab_to_pascal(""), "");
    }

    #[test]
    fn test_message_phrasing() {
        assert_eq!(must_be("a string"), "must be a string");
        assert_eq!(must_not_be("empty"), "must not be empty");
        assert_eq!(must_have("properties name, url"), "must have properties name, url");
    }
}
