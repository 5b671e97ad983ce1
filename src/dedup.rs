use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::models::EntryHash;

/// Hashes of every entry already written to the ledger, backed by an
/// append-only log with one hex digest per line.
pub struct DedupStore {
    hashes: HashSet<EntryHash>,
    log: File,
}

impl DedupStore {
    /// Load the existing log (a missing file means no history) and keep it
    /// open for appending.
    pub fn open(path: &Path) -> Result<Self> {
        let mut hashes = HashSet::new();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            hashes.extend(
                content
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(EntryHash::from_hex),
            );
        }
        info!("found {} existing hashes", hashes.len());
        let log = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { hashes, log })
    }

    pub fn contains(&self, hash: &EntryHash) -> bool {
        self.hashes.contains(hash)
    }

    /// Record a hash and make the log line durable before returning.
    pub fn accept(&mut self, hash: EntryHash) -> Result<()> {
        writeln!(self.log, "{hash}")?;
        self.log.sync_data()?;
        self.hashes.insert(hash);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }
}
