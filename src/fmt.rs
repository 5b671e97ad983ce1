use sha2::{Digest, Sha256};

use crate::models::{Entry, EntryHash};

/// Counter-posting every imported entry is balanced against.
pub const UNKNOWN_ACCOUNT: &str = "Expenses:Unknown";

/// Date layout used in ledger headers.
pub const LEDGER_DATE_FORMAT: &str = "%Y/%m/%d";

/// Render an amount as the shortest text that round-trips: `-4.5`, `100.0`,
/// `1e+16`, `1e-05`. Existing hash logs depend on this exact spelling.
pub fn amount(val: f64) -> String {
    let sci = format!("{val:e}");
    if let Some((mantissa, exp)) = sci
        .split_once('e')
        .and_then(|(m, e)| e.parse::<i32>().ok().map(|e| (m, e)))
    {
        if !(-4..16).contains(&exp) {
            let sign = if exp < 0 { '-' } else { '+' };
            return format!("{mantissa}e{sign}{:02}", exp.abs());
        }
    }
    let plain = format!("{val}");
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

pub fn date(entry: &Entry) -> String {
    entry.date().format(LEDGER_DATE_FORMAT).to_string()
}

/// The exact ledger block for an entry. Spacing, tabs and the trailing blank
/// line are part of the hash input.
pub fn render_entry(entry: &Entry) -> String {
    format!(
        "{} {}\n\t{}  {}\n\t{UNKNOWN_ACCOUNT}\n\n",
        date(entry),
        entry.payee(),
        entry.account(),
        amount(entry.amount()),
    )
}

pub fn hash_text(text: &str) -> EntryHash {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    EntryHash::from_hex(&hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn coffee() -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "coffee shop".to_string(),
            -4.5,
            "Assets:Checking".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(amount(-4.5), "-4.5");
        assert_eq!(amount(100.0), "100.0");
        assert_eq!(amount(1234.56), "1234.56");
        assert_eq!(amount(0.0), "0.0");
        assert_eq!(amount(-0.0), "-0.0");
        assert_eq!(amount(0.0001), "0.0001");
        assert_eq!(amount(0.00001), "1e-05");
        assert_eq!(amount(1e16), "1e+16");
        assert_eq!(amount(1.5e17), "1.5e+17");
        assert_eq!(amount(1e15), "1000000000000000.0");
        assert_eq!(amount(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_render_entry_layout() {
        assert_eq!(
            render_entry(&coffee()),
            "2024/01/05 coffee shop\n\tAssets:Checking  -4.5\n\tExpenses:Unknown\n\n"
        );
    }

    #[test]
    fn test_hash_is_sha256_of_rendered_text() {
        let hash = hash_text(&render_entry(&coffee()));
        assert_eq!(
            hash.to_string(),
            "3377fe79bdd7991764b98aeb52c7c47db0e566c570b766d022c043d3c78768ef"
        );
    }

    #[test]
    fn test_hash_changes_with_any_field() {
        let base = hash_text(&render_entry(&coffee()));
        let other = Entry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "coffee shop".to_string(),
            -4.51,
            "Assets:Checking".to_string(),
        )
        .unwrap();
        assert_ne!(base, hash_text(&render_entry(&other)));
        assert_eq!(base, hash_text(&render_entry(&coffee())));
    }
}
