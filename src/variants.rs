//! # Variant Generator Module
//!
//! Turns the raw translation candidates returned by the gateway into the option list shown
//! under a translation: every distinct candidate once, in the order the provider returned
//! them, followed by synthetic "combined" options made of several candidates joined together.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Separator used when joining candidates into a combined option
pub const COMBINED_SEPARATOR: &str = ", ";

/// Deduplicate candidates by exact text, keeping first-seen order
pub fn unique_candidates<S: AsRef<str>>(candidates: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|candidate| seen.insert(*candidate))
        .map(str::to_string)
        .collect()
}

/// Draw `size` distinct candidates, order them by length and join them.
///
/// With fewer than `size` candidates available the result degrades to whatever exists
/// (a single candidate, or an empty string).
pub fn combined_variant<R: Rng + ?Sized>(unique: &[String], size: usize, rng: &mut R) -> String {
    let mut picks: Vec<&String> = unique.choose_multiple(rng, size).collect();
    picks.sort_by_key(|pick| pick.chars().count());
    picks
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(COMBINED_SEPARATOR)
}

/// Build the full option list: unique candidates followed by `combined_count` combined ones.
///
/// Combined options are drawn independently, so they may repeat each other or duplicate a
/// single candidate when fewer than two candidates exist.
pub fn generate_variants<S, R>(
    candidates: &[S],
    combined_count: usize,
    combined_size: usize,
    rng: &mut R,
) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let unique = unique_candidates(candidates);
    let combined: Vec<String> = (0..combined_count)
        .map(|_| combined_variant(&unique, combined_size, rng))
        .collect();

    let mut options = unique;
    options.extend(combined);
    options
}
