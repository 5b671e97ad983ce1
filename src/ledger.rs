use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::Result;

/// Append-only handle on the ledger file.
pub struct LedgerWriter {
    file: File,
    written: usize,
}

impl LedgerWriter {
    /// Open (or create) the ledger. If it is empty and `template` exists, the
    /// template is copied in verbatim before anything else.
    pub fn open(path: &Path, template: Option<&Path>) -> Result<Self> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            if let Some(template) = template.filter(|t| t.exists()) {
                info!("Ledger is empty, copying {}", template.display());
                file.write_all(&std::fs::read(template)?)?;
                file.sync_data()?;
            }
        }
        Ok(Self { file, written: 0 })
    }

    /// Append one rendered entry and flush it to disk.
    pub fn append(&mut self, block: &str) -> Result<()> {
        self.file.write_all(block.as_bytes())?;
        self.file.sync_data()?;
        self.written += 1;
        Ok(())
    }

    /// Entries appended through this handle.
    pub fn written(&self) -> usize {
        self.written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "; accounts\naccount Assets:Checking\n\n";

    #[test]
    fn test_template_copied_into_new_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("main.ledger");
        let template = dir.path().join("main.ledger.config");
        std::fs::write(&template, TEMPLATE).unwrap();

        let mut writer = LedgerWriter::open(&ledger, Some(&template)).unwrap();
        writer.append("entry\n").unwrap();
        assert_eq!(std::fs::read_to_string(&ledger).unwrap(), format!("{TEMPLATE}entry\n"));
        assert_eq!(writer.written(), 1);
    }

    #[test]
    fn test_template_not_repeated_for_non_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("main.ledger");
        let template = dir.path().join("main.ledger.config");
        std::fs::write(&template, TEMPLATE).unwrap();

        LedgerWriter::open(&ledger, Some(&template)).unwrap();
        let mut writer = LedgerWriter::open(&ledger, Some(&template)).unwrap();
        writer.append("entry\n").unwrap();
        assert_eq!(std::fs::read_to_string(&ledger).unwrap(), format!("{TEMPLATE}entry\n"));
    }

    #[test]
    fn test_missing_template_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("main.ledger");
        let mut writer =
            LedgerWriter::open(&ledger, Some(&dir.path().join("missing.config"))).unwrap();
        writer.append("entry\n").unwrap();
        assert_eq!(std::fs::read_to_string(&ledger).unwrap(), "entry\n");
    }

    #[test]
    fn test_template_applies_again_once_ledger_emptied() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("main.ledger");
        let template = dir.path().join("main.ledger.config");
        std::fs::write(&template, TEMPLATE).unwrap();

        let mut writer = LedgerWriter::open(&ledger, Some(&template)).unwrap();
        writer.append("2024/01/05 x\n\n").unwrap();
        drop(writer);
        LedgerWriter::open(&ledger, Some(&template)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&ledger).unwrap(),
            format!("{TEMPLATE}2024/01/05 x\n\n")
        );

        std::fs::write(&ledger, "").unwrap();
        LedgerWriter::open(&ledger, Some(&template)).unwrap();
        assert_eq!(std::fs::read_to_string(&ledger).unwrap(), TEMPLATE);
    }
}
