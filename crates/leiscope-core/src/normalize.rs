//! Legal-entity name canonicalization and the containment match policy.
//!
//! Registry names and website-derived names mostly differ in punctuation,
//! legal-form suffixes ("Corp." vs "Corporation") and whitespace. After
//! [`normalize`] the two sides are compared with [`names_match`], which only
//! accepts substring containment in either direction.
//!
//! ```rust
//! use leiscope_core::normalize::{names_match, normalize};
//!
//! assert_eq!(normalize("Google Inc."), "google");
//! assert!(names_match(&normalize("Alphabet Inc"), &normalize("Alphabet")));
//! assert!(!names_match(&normalize("Inc."), &normalize("Acme Ltd")));
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Legal-form tokens removed as whole words, each with an optional trailing period.
pub const LEGAL_SUFFIXES: [&str; 16] = [
    "inc",
    "incorporated",
    "llc",
    "l.l.c",
    "ltd",
    "limited",
    "l.t.d",
    "corp",
    "corporation",
    "gmbh",
    "ag",
    "sa",
    "sarl",
    "plc",
    "co",
    "company",
];

static SUFFIX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LEGAL_SUFFIXES
        .iter()
        .map(|suffix| {
            Regex::new(&format!(r"\b{}\.?\b", regex::escape(suffix)))
                .expect("legal suffix pattern is valid")
        })
        .collect()
});

// `\w` would keep connector punctuation such as `_`.
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{N}\s]").expect("punctuation pattern is valid")
});

/// Canonicalizes a legal-entity name for comparison.
///
/// Lowercases, drops legal-form suffix tokens, drops punctuation and
/// collapses whitespace. The stripping steps repeat until nothing changes,
/// so removing punctuation can never expose a suffix a second call would
/// strip (`"A.G."` ends up empty, not `"ag"`). A name made only of suffixes
/// normalizes to the empty string.
pub fn normalize(name: &str) -> String {
    let mut current = name.to_lowercase();

    loop {
        let next = strip_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_once(name: &str) -> String {
    let mut stripped = name.to_owned();

    for pattern in SUFFIX_PATTERNS.iter() {
        stripped = pattern.replace_all(&stripped, "").into_owned();
    }

    stripped = PUNCTUATION.replace_all(&stripped, "").into_owned();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bidirectional containment on already-normalized names.
///
/// An empty name never matches, not even another empty name: containment
/// of the empty string is vacuously true and would select an arbitrary
/// candidate.
pub fn names_match(left: &str, right: &str) -> bool {
    if left.is_empty() || right.is_empty() {
        return false;
    }

    left.contains(right) || right.contains(left)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_suffix_with_period() {
        assert_eq!(normalize("Google Inc."), "google");
        assert_eq!(normalize("GOOGLE INC"), "google");
        assert_eq!(normalize("google"), "google");
    }

    #[test]
    fn strips_every_suffix_token_anywhere_in_the_name() {
        assert_eq!(normalize("Acme Co. Holdings Ltd"), "acme holdings");
        assert_eq!(normalize("Siemens AG"), "siemens");
        assert_eq!(normalize("Example L.L.C."), "example");
        assert_eq!(normalize("Widget Company Limited"), "widget");
        assert_eq!(normalize("Banco Santander, S.A."), "banco santander");
        assert_eq!(normalize("Bosch GmbH"), "bosch");
        assert_eq!(normalize("Vodafone Group Plc"), "vodafone group");
    }

    #[test]
    fn keeps_suffix_letters_inside_longer_words() {
        assert_eq!(normalize("Cobalt Incubator"), "cobalt incubator");
        assert_eq!(normalize("Agora Sandbox"), "agora sandbox");
    }

    #[test]
    fn removes_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("  Procter   &  Gamble  "), "procter gamble");
        assert_eq!(normalize("AT&T Inc."), "att");
        assert_eq!(normalize("Yahoo!"), "yahoo");
        assert_eq!(normalize("Acme_Holdings Ltd"), "acmeholdings");
        assert_eq!(normalize("__init__ Corp"), "init");
    }

    #[test]
    fn suffix_only_names_normalize_to_empty() {
        assert_eq!(normalize("Inc. Ltd."), "");
        assert_eq!(normalize("Company"), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Google Inc.",
            "Foo A.G.",
            "x _inc",
            "c.o",
            "Example Holdings Ltd",
            "Société Générale S.A.",
            "  Müller & Söhne GmbH & Co. KG ",
            "Inc. Ltd.",
            "l.t.d.co.",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample: {sample:?}");
        }
    }

    #[test]
    fn punctuation_that_hides_a_suffix_is_fully_stripped() {
        assert_eq!(normalize("Foo A.G."), "foo");
    }

    #[test]
    fn match_is_bidirectional_containment() {
        assert!(names_match("alphabet", "alphabet"));
        assert!(names_match("alphabet holdings", "alphabet"));
        assert!(names_match("alphabet", "alphabet holdings"));
        assert!(!names_match("acme industries", "globex"));
    }

    #[test]
    fn empty_names_never_match() {
        assert!(!names_match("", "acme"));
        assert!(!names_match("acme", ""));
        assert!(!names_match("", ""));
    }
}
