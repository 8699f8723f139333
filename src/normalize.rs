//! Name folding used for picker search.
//!
//! Library names and the query go through the same normalizer, so a query
//! matches when its folded form is a substring of the folded name.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub trait NameNormalizer {
    fn normalize(&self, name: &str) -> String;
}

/// Default normalizer: NFKD decomposition, combining marks dropped, lowercased,
/// trimmed, inner whitespace runs collapsed to one space.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldingNormalizer;

impl NameNormalizer for FoldingNormalizer {
    fn normalize(&self, name: &str) -> String {
        let folded: String = name
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl<F> NameNormalizer for F
where
    F: Fn(&str) -> String,
{
    fn normalize(&self, name: &str) -> String {
        self(name)
    }
}
