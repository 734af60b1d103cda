//! Variant guessing from template directory names.
//!
//! Best-effort only. A template named `home-electronic-2` is most likely the
//! electronics flavour, but nothing guarantees it; operators are expected to
//! correct the generated configuration by hand where the guess is wrong.

use crate::components::DEFAULT_VARIANT;

/// Keywords recognised in template names, checked in this order.
pub const VARIANT_VOCABULARY: &[&str] = &[
    "electronic",
    "fashion",
    "cosmetic",
    "furniture",
    "grocery",
    "jewelry",
];

/// Guess a section variant from a template name.
///
/// Returns the first vocabulary word contained in the name (case
/// insensitive), or `"default"`.
pub fn guess_variant(template_name: &str) -> &'static str {
    let name = template_name.to_lowercase();
    VARIANT_VOCABULARY
        .iter()
        .find(|word| name.contains(*word))
        .copied()
        .unwrap_or(DEFAULT_VARIANT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_substrings() {
        assert_eq!(guess_variant("home-electronic"), "electronic");
        assert_eq!(guess_variant("home-electronics-2"), "electronic");
        assert_eq!(guess_variant("HomeFashion"), "fashion");
        assert_eq!(guess_variant("cosmetics-store"), "cosmetic");
    }

    #[test]
    fn unknown_names_use_default() {
        assert_eq!(guess_variant("home-1"), "default");
        assert_eq!(guess_variant(""), "default");
    }

    #[test]
    fn first_vocabulary_word_wins() {
        assert_eq!(guess_variant("fashion-electronic"), "electronic");
    }
}
