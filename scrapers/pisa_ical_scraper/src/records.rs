//! Field extraction from the site's XML-ish listing fragments.
//!
//! A listing looks like `<divisionid>12</divisionid><divisionname>F1R</divisionname>...`.
//! Every occurrence of `<tag>value</tag>` with a non-empty value and no nested
//! markup is a field. Anything else (empty elements, attributes, nested tags)
//! is not a field and is ignored.
//!
//! Paired listings are zipped in document order. When the two field lists have
//! different lengths the listing is malformed; [`Pairing`] decides whether that
//! drops the unpaired tail or fails.

use regex::Regex;
use tracing::warn;

use crate::error::{ScrapeError, ScrapeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pairing {
    /// Keep the pairs both lists have and log the dropped tail.
    #[default]
    Truncate,
    /// Refuse to pair lists of unequal length.
    Strict,
}

impl Pairing {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Pairing::Strict
        } else {
            Pairing::Truncate
        }
    }
}

fn tag_pattern(tag: &str) -> ScrapeResult<Regex> {
    let escaped = regex::escape(tag);
    Regex::new(&format!(r"<{escaped}>([^<]+)</{escaped}>")).map_err(|source| ScrapeError::Pattern {
        tag: tag.to_string(),
        source,
    })
}

/// All values of `<tag>` in document order.
pub fn extract_field(text: &str, tag: &str) -> ScrapeResult<Vec<String>> {
    let re = tag_pattern(tag)?;
    Ok(re
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect())
}

/// Values of `first_tag` and `second_tag` paired in document order.
pub fn extract_pairs(
    text: &str,
    first_tag: &str,
    second_tag: &str,
    pairing: Pairing,
) -> ScrapeResult<Vec<(String, String)>> {
    let first = extract_field(text, first_tag)?;
    let second = extract_field(text, second_tag)?;

    if first.len() != second.len() {
        match pairing {
            Pairing::Strict => {
                return Err(ScrapeError::MismatchedFields {
                    first: first_tag.to_string(),
                    first_len: first.len(),
                    second: second_tag.to_string(),
                    second_len: second.len(),
                });
            }
            Pairing::Truncate => warn!(
                "<{}> has {} values but <{}> has {}; keeping the first {} pairs",
                first_tag,
                first.len(),
                second_tag,
                second.len(),
                first.len().min(second.len())
            ),
        }
    }

    Ok(first.into_iter().zip(second).collect())
}
