use std::path::Path;

use log::{info, warn};

use crate::error::Result;

/// Operator replies that end the run early without an error.
pub const STOP_WORDS: &[&str] = &["quit", "exit", "stop"];

/// Asks someone for the canonical name of a payee nothing in the dictionary
/// matched. Blocks until an answer comes back.
pub trait PayeeResolver {
    fn resolve(&mut self, cleaned: &str) -> Result<String>;
}

/// Known payee names, kept longest-first as loaded.
///
/// Names learned during a run are appended at the end and the list is not
/// re-sorted until [`PayeeDictionary::persist`] writes it back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayeeDictionary {
    payees: Vec<String>,
}

impl PayeeDictionary {
    /// Sorts by descending length; equal lengths keep their given order.
    pub fn from_payees<I, S>(payees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dict = Self::default();
        for payee in payees {
            let payee = payee.into();
            let payee = payee.trim();
            if !payee.is_empty() && !dict.contains(payee) {
                dict.payees.push(payee.to_string());
            }
        }
        dict.payees = sorted_longest_first(&dict.payees);
        dict
    }

    /// A missing file is an empty dictionary.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let dict = Self::from_payees(content.lines());
        info!("found {} payees", dict.len());
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.payees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payees.is_empty()
    }

    pub fn contains(&self, payee: &str) -> bool {
        self.payees.iter().any(|p| p == payee)
    }

    /// Scan every known payee in order and return the last one contained in
    /// `cleaned`. The scan never stops early, so with `["amazon prime",
    /// "amazon"]` the shorter name wins for "amazon prime purchase".
    pub fn find_match(&self, cleaned: &str) -> Option<&str> {
        let mut found = None;
        for payee in &self.payees {
            if cleaned.contains(payee.as_str()) {
                found = Some(payee.as_str());
            }
        }
        found
    }

    /// Append a newly learned payee. Returns false if it was already known.
    pub fn learn(&mut self, payee: &str) -> bool {
        if payee.is_empty() || self.contains(payee) {
            return false;
        }
        self.payees.push(payee.to_string());
        true
    }

    /// Rewrite the whole file, longest payee first, one per line.
    pub fn persist(&self, path: &Path) -> Result<()> {
        info!("Saving {} payees to {}...", self.len(), path.display());
        let mut content = String::new();
        for payee in sorted_longest_first(&self.payees) {
            content.push_str(&payee);
            content.push('\n');
        }
        // Sibling temp file, then rename over the original.
        let mut tmp = path.as_os_str().to_os_string();
        tmp.push(".tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn sorted_longest_first(payees: &[String]) -> Vec<String> {
    let mut sorted = payees.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));
    sorted
}

/// How a cleaned payee was settled for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A dictionary entry matched.
    Matched(String),
    /// The operator typed a new name; it is now in the dictionary.
    Learned(String),
    /// The operator accepted the cleaned text as is.
    Kept(String),
    /// The operator asked to stop processing rows.
    Stop,
}

pub fn resolve_payee(
    dict: &mut PayeeDictionary,
    cleaned: String,
    resolver: &mut dyn PayeeResolver,
) -> Result<Resolution> {
    if let Some(found) = dict.find_match(&cleaned) {
        return Ok(Resolution::Matched(found.to_string()));
    }
    warn!("Payee not found: {cleaned}");
    let answer = resolver.resolve(&cleaned)?;
    if answer.is_empty() {
        return Ok(Resolution::Kept(cleaned));
    }
    if STOP_WORDS.contains(&answer.as_str()) {
        return Ok(Resolution::Stop);
    }
    dict.learn(&answer);
    Ok(Resolution::Learned(answer))
}

/// Replays canned answers in order; panics if asked more often than scripted.
#[cfg(test)]
pub struct ScriptedResolver {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedResolver {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl PayeeResolver for ScriptedResolver {
    fn resolve(&mut self, cleaned: &str) -> Result<String> {
        self.asked.push(cleaned.to_string());
        Ok(self
            .answers
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected prompt for {cleaned:?}")))
    }
}
