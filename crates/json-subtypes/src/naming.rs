//! Naming policies and case-insensitive comparison.
//!
//! Hosts rename properties and enum members on the wire (`camelCase`,
//! `snake_case`, ...). Configured names are written in their declared form and
//! converted through the active policy before they are compared with keys.

use serde::Deserialize;

/// A naming policy as applied by the host serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingPolicy {
    CamelCase,
    PascalCase,
    SnakeCaseLower,
    SnakeCaseUpper,
    KebabCaseLower,
    KebabCaseUpper,
}

impl NamingPolicy {
    /// Converts a declared name (any of `PascalCase`, `camelCase`, `snake_case`,
    /// `kebab-case`) into this policy's spelling.
    pub fn convert(self, name: &str) -> String {
        let words = split_words(name);
        match self {
            Self::CamelCase => {
                let mut out = String::with_capacity(name.len());
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        push_capitalized(&mut out, word);
                    }
                }
                out
            }
            Self::PascalCase => {
                let mut out = String::with_capacity(name.len());
                for word in &words {
                    push_capitalized(&mut out, word);
                }
                out
            }
            Self::SnakeCaseLower => join_words(&words, '_', false),
            Self::SnakeCaseUpper => join_words(&words, '_', true),
            Self::KebabCaseLower => join_words(&words, '-', false),
            Self::KebabCaseUpper => join_words(&words, '-', true),
        }
    }

    /// Converts every segment of a dotted property path.
    pub fn convert_path(self, path: &str) -> String {
        path.split('.')
            .map(|segment| self.convert(segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Ordinal case-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}

fn join_words(words: &[&str], sep: char, upper: bool) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        if upper {
            out.push_str(&word.to_uppercase());
        } else {
            out.push_str(&word.to_lowercase());
        }
    }
    out
}

/// Splits an identifier into words at separators and case boundaries.
///
/// Runs of capitals stay together except for their last letter when it starts
/// a new capitalized word: `HTTPServer` -> `HTTP`, `Server`.
fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for part in name.split(['_', '-', ' ']) {
        let chars: Vec<(usize, char)> = part.char_indices().collect();
        let mut start = 0;
        for i in 1..chars.len() {
            let (idx, c) = chars[i];
            let prev = chars[i - 1].1;
            let next_lower = chars.get(i + 1).is_some_and(|(_, n)| n.is_lowercase());
            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase() && prev.is_uppercase() && next_lower);
            if boundary {
                words.push(&part[start..idx]);
                start = idx;
            }
        }
        if start < part.len() {
            words.push(&part[start..]);
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_matrix() {
        assert_eq!(split_words("PayloadKind"), vec!["Payload", "Kind"]);
        assert_eq!(split_words("payloadKind"), vec!["payload", "Kind"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("snake_case_name"), vec!["snake", "case", "name"]);
        assert_eq!(split_words("kebab-case"), vec!["kebab", "case"]);
        assert_eq!(split_words("Level2Boss"), vec!["Level2", "Boss"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn convert_matrix() {
        assert_eq!(NamingPolicy::CamelCase.convert("SoundKind"), "soundKind");
        assert_eq!(NamingPolicy::CamelCase.convert("URLValue"), "urlValue");
        assert_eq!(NamingPolicy::PascalCase.convert("sound_kind"), "SoundKind");
        assert_eq!(NamingPolicy::SnakeCaseLower.convert("SoundKind"), "sound_kind");
        assert_eq!(NamingPolicy::SnakeCaseUpper.convert("SoundKind"), "SOUND_KIND");
        assert_eq!(NamingPolicy::KebabCaseLower.convert("SoundKind"), "sound-kind");
        assert_eq!(NamingPolicy::KebabCaseUpper.convert("soundKind"), "SOUND-KIND");
    }

    #[test]
    fn convert_path_keeps_dots() {
        assert_eq!(
            NamingPolicy::SnakeCaseLower.convert_path("Nested.OtherProperty"),
            "nested.other_property"
        );
    }

    #[test]
    fn ignore_case() {
        assert!(eq_ignore_case("Sound", "sound"));
        assert!(eq_ignore_case("ÄRGER", "ärger"));
        assert!(!eq_ignore_case("Sound", "sounds"));
    }

    #[test]
    fn policy_deserializes_from_camel_case() {
        let policy: NamingPolicy = serde_json::from_str("\"snakeCaseLower\"").unwrap();
        assert_eq!(policy, NamingPolicy::SnakeCaseLower);
        let policy: NamingPolicy = serde_json::from_str("\"camelCase\"").unwrap();
        assert_eq!(policy, NamingPolicy::CamelCase);
        assert!(serde_json::from_str::<NamingPolicy>("\"snake_case_lower\"").is_err());
    }
}
