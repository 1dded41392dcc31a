use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Left padding character. Never survives `normalize`, so padded q-grams
/// cannot collide with q-grams taken from the middle of a name.
pub const PAD: char = '$';

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N}]+").expect("valid regex");
}

/// Canonical form used for indexing and matching: NFKC, lowercase, letters and numbers only.
pub fn normalize(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    NON_WORD.replace_all(&lowered, "").into_owned()
}

/// The `q - 1` padding characters put in front of every normalized string.
pub fn padding(q: usize) -> String {
    std::iter::repeat(PAD).take(q.saturating_sub(1)).collect()
}

/// All overlapping q-grams of the padded, normalized form of `text`, left to right.
///
/// A normalized string of `L` chars yields exactly `L` q-grams.
pub fn qgrams(text: &str, q: usize) -> Vec<String> {
    if q == 0 {
        return Vec::new();
    }
    let padded: Vec<char> = padding(q).chars().chain(normalize(text).chars()).collect();
    if padded.len() < q {
        return Vec::new();
    }
    padded.windows(q).map(|w| w.iter().collect()).collect()
}
