use std::fmt;

use chrono::NaiveDate;

use crate::error::{ImportError, Result};

/// One input record, fields in file order.
pub type Row = Vec<String>;

/// A fully validated transaction, ready to be rendered into the ledger.
///
/// Only built through [`Entry::new`], so a value of this type never carries a
/// blank payee or a non-finite amount.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    date: NaiveDate,
    payee: String,
    amount: f64,
    account: String,
}

impl Entry {
    pub fn new(date: NaiveDate, payee: String, amount: f64, account: String) -> Result<Self> {
        if payee.trim().is_empty() {
            return Err(ImportError::EmptyPayee { row: 0 });
        }
        if !amount.is_finite() {
            return Err(ImportError::InvalidAmount {
                row: 0,
                value: amount.to_string(),
            });
        }
        Ok(Self {
            date,
            payee,
            amount,
            account,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

/// Lowercase hex SHA-256 of an entry's canonical text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryHash(String);

impl EntryHash {
    /// Wraps a digest read back from the hash log.
    pub fn from_hex(hex: &str) -> Self {
        Self(hex.trim().to_string())
    }
}

impl fmt::Display for EntryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the pipeline did with the rows it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates: usize,
    pub skipped_rows: usize,
    pub learned_payees: usize,
    pub stopped: bool,
}
