use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("invalid digits regex"))
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("invalid punctuation regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

/// Normalizes raw bank descriptions so the same merchant produces the same
/// text across statements.
#[derive(Debug, Clone, Copy)]
pub struct PayeeCleaner {
    enabled: bool,
    strip_diacritics: bool,
}

impl PayeeCleaner {
    pub fn new(enabled: bool, strip_diacritics: bool) -> Self {
        Self {
            enabled,
            strip_diacritics,
        }
    }

    pub fn clean(&self, raw: &str) -> String {
        if !self.enabled {
            return raw.to_string();
        }
        let payee = raw.to_lowercase();
        let payee = remove_reference_numbers(&payee);
        let payee = punctuation_re().replace_all(&payee, "");
        let payee = whitespace_re().replace_all(&payee, " ").trim().to_string();
        if self.strip_diacritics {
            payee.nfkd().filter(|c| !is_combining_mark(*c)).collect()
        } else {
            payee
        }
    }
}

/// Drop digit runs that do not touch a letter on either side, so `ref 123456`
/// loses its number while `4g` or `a1b` stay intact.
// Whole runs only: a lookaround regex would backtrack (`shop24` -> `shop2`),
// so raw cleaned payees of such rows hash differently from older hash logs.
fn remove_reference_numbers(text: &str) -> String {
    let touches_letter = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphabetic());
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in digits_re().find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if touches_letter(before) || touches_letter(after) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}
