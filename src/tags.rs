//! Development tag codec.
//!
//! A task's development tags travel as a fixed-width string of `'0'`/`'1'`
//! characters. Position `i` of [`DEVELOPMENT_TAGS`] owns bit value `1 << i`,
//! and the rightmost character is bit 0. Reordering or growing the
//! vocabulary invalidates every stored vector.

use thiserror::Error;
use tracing::warn;

/// Ordered development tag vocabulary. Index is bit position.
pub const DEVELOPMENT_TAGS: [&str; 5] = ["front-end", "back-end", "ui-ux", "api", "testing"];

/// Width of an encoded bit vector.
pub const BIT_VECTOR_WIDTH: usize = DEVELOPMENT_TAGS.len();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unknown development tag '{0}' (expected one of: {list})", list = DEVELOPMENT_TAGS.join(", "))]
    Unknown(String),
}

/// Bit value of a vocabulary label.
pub fn tag_value(label: &str) -> Option<u32> {
    let wanted = label.trim().to_lowercase();
    DEVELOPMENT_TAGS
        .iter()
        .position(|t| *t == wanted)
        .map(|i| 1 << i)
}

/// OR tag values together and render the result as a padded binary string.
///
/// Results wider than [`BIT_VECTOR_WIDTH`] keep only their low digits.
pub fn encode<I>(values: I) -> String
where
    I: IntoIterator<Item = u32>,
{
    let combined = values.into_iter().fold(0u32, |acc, v| acc | v);
    let binary = format!("{:0width$b}", combined, width = BIT_VECTOR_WIDTH);
    if binary.len() > BIT_VECTOR_WIDTH {
        warn!(value = combined, "development tags exceed {BIT_VECTOR_WIDTH}-bit vector, truncating");
        binary[binary.len() - BIT_VECTOR_WIDTH..].to_string()
    } else {
        binary
    }
}

/// Encode a list of vocabulary labels.
pub fn encode_labels<S: AsRef<str>>(labels: &[S]) -> Result<String, TagError> {
    let values = labels
        .iter()
        .map(|l| tag_value(l.as_ref()).ok_or_else(|| TagError::Unknown(l.as_ref().to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(encode(values))
}

/// Split comma-separated label arguments (`--tag api,testing --tag ui-ux`).
pub fn split_labels(inputs: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let part = part.trim().to_lowercase();
            if !part.is_empty() && !out.contains(&part) {
                out.push(part);
            }
        }
    }
    out
}

/// Integer mask of a bit vector. Bits beyond the vocabulary are dropped.
pub fn mask(bits: &str) -> u32 {
    bits.chars()
        .rev()
        .take(BIT_VECTOR_WIDTH)
        .enumerate()
        .filter(|(_, c)| *c == '1')
        .fold(0, |acc, (i, _)| acc | (1 << i))
}

/// Lazily decode a bit vector into vocabulary labels, lowest bit first.
pub fn decode(bits: &str) -> DecodedTags<'_> {
    DecodedTags {
        bits: bits.chars().rev(),
        index: 0,
    }
}

/// Iterator returned by [`decode`].
pub struct DecodedTags<'a> {
    bits: std::iter::Rev<std::str::Chars<'a>>,
    index: usize,
}

impl<'a> Iterator for DecodedTags<'a> {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < DEVELOPMENT_TAGS.len() {
            let c = self.bits.next()?;
            let j = self.index;
            self.index += 1;
            if c == '1' {
                return Some(DEVELOPMENT_TAGS[j]);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for DecodedTags<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode(Vec::<u32>::new()), "00000");
        assert_eq!(encode([1]), "00001");
        assert_eq!(encode([1, 2]), "00011");
        assert_eq!(encode([16]), "10000");
        assert_eq!(encode([1, 1, 4]), "00101");
    }

    #[test]
    fn overflow_keeps_low_digits() {
        assert_eq!(encode([32]), "00000");
        assert_eq!(encode([32, 1]), "00001");
    }

    #[test]
    fn decodes_known_vectors() {
        assert_eq!(decode("00000").count(), 0);
        let labels: Vec<_> = decode("10101").collect();
        assert_eq!(labels, vec!["front-end", "ui-ux", "testing"]);
    }

    #[test]
    fn decode_tolerates_short_and_long_vectors() {
        let short: Vec<_> = decode("10").collect();
        assert_eq!(short, vec!["back-end"]);
        let long: Vec<_> = decode("1100001").collect();
        assert_eq!(long, vec!["front-end"]);
        assert_eq!(decode("").count(), 0);
    }

    #[test]
    fn decode_of_encode_is_identity_for_every_subset() {
        for set in 0u32..32 {
            let values: Vec<u32> = (0..5).map(|i| 1 << i).filter(|v| set & v != 0).collect();
            let expected: Vec<&str> = (0..5)
                .filter(|i| set & (1 << i) != 0)
                .map(|i| DEVELOPMENT_TAGS[i])
                .collect();
            let decoded: Vec<&str> = decode(&encode(values)).collect();
            assert_eq!(decoded, expected, "subset {set:05b}");
        }
    }

    #[test]
    fn mask_reads_binary_not_decimal() {
        assert_eq!(mask("00011"), 3);
        assert_eq!(mask("10000"), 16);
        assert_eq!(mask("110000"), 16);
    }

    #[test]
    fn labels_encode_and_reject_unknown() {
        assert_eq!(encode_labels(&["api", "Front-End"]).unwrap(), "01001");
        assert_eq!(
            encode_labels(&["devops"]),
            Err(TagError::Unknown("devops".to_string()))
        );
    }

    #[test]
    fn split_labels_dedups_and_normalises() {
        let raw = vec!["api, testing".to_string(), "API".to_string()];
        assert_eq!(split_labels(&raw), vec!["api", "testing"]);
    }
}
