use std::path::Path;

use log::{debug, info, warn};

use crate::cleaner::PayeeCleaner;
use crate::dedup::DedupStore;
use crate::error::Result;
use crate::fmt;
use crate::ledger::LedgerWriter;
use crate::models::{Entry, ImportSummary, Row};
use crate::normalizer::{extract_amount, extract_date, extract_raw_payee};
use crate::payees::{resolve_payee, PayeeDictionary, PayeeResolver, Resolution};
use crate::settings::{ArtifactPaths, Encoding, ImportConfig};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

pub fn load_input(path: &Path, encoding: Encoding) -> Result<String> {
    encoding.decode(std::fs::read(path)?)
}

/// Split decoded CSV text into rows, dropping the header record if asked.
///
/// Blank lines come back as empty rows so they keep their row number; the csv
/// reader itself skips them silently.
pub fn read_rows(text: &str, config: &ImportConfig) -> Result<Vec<Row>> {
    let bytes = text.as_bytes();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter)
        .from_reader(bytes);
    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    let mut consumed = 0;
    loop {
        let more = rdr.read_record(&mut record)?;
        let end = rdr.position().byte() as usize;
        for _ in 0..leading_blank_lines(bytes, consumed, end) {
            rows.push(Row::new());
        }
        if !more {
            break;
        }
        rows.push(record.iter().map(str::to_string).collect());
        consumed = end;
    }
    if config.skip_header && !rows.is_empty() {
        rows.remove(0);
    }
    Ok(rows)
}

/// Count the empty lines at the start of `bytes[start..end]`. A record ending
/// in `\r\n` is cut after the `\r`, so a `\n` right behind it is not a line.
fn leading_blank_lines(bytes: &[u8], start: usize, end: usize) -> usize {
    let mut pos = start;
    if pos > 0 && bytes[pos - 1] == b'\r' && bytes.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    let mut count = 0;
    while pos < end {
        match bytes[pos] {
            b'\r' if bytes.get(pos + 1) == Some(&b'\n') => pos += 2,
            b'\r' | b'\n' => pos += 1,
            _ => break,
        }
        count += 1;
    }
    count
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

enum RowOutcome {
    Converted(Entry),
    Skipped,
    Stop,
}

/// One run against a ledger: owns the payee dictionary and the dedup index
/// for as long as rows are being processed.
pub struct Importer<'a> {
    config: &'a ImportConfig,
    cleaner: PayeeCleaner,
    payees: PayeeDictionary,
    dedup: DedupStore,
    ledger: LedgerWriter,
}

impl<'a> Importer<'a> {
    pub fn open(config: &'a ImportConfig, paths: &ArtifactPaths) -> Result<Self> {
        let dedup = DedupStore::open(&paths.hashes)?;
        let payees = PayeeDictionary::load(&paths.payees)?;
        let ledger = LedgerWriter::open(&paths.ledger, Some(&paths.template))?;
        if payees.is_empty() {
            info!("No known payees yet, every payee will be asked for");
        }
        Ok(Self {
            config,
            cleaner: PayeeCleaner::new(config.clean, config.strip_diacritics()),
            payees,
            dedup,
            ledger,
        })
    }

    /// Convert rows until they run out or the operator stops. Any fatal row
    /// returns the error right away; entries accepted before it stay on disk.
    pub fn process_rows<I>(
        &mut self,
        rows: I,
        resolver: &mut dyn PayeeResolver,
    ) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = Row>,
    {
        let known_payees = self.payees.len();
        let mut summary = ImportSummary::default();
        for (idx, row) in rows.into_iter().enumerate() {
            let row_num = idx + 1;
            debug!("--- Row {row_num} ---");
            debug!("row: {row:?}");
            match self.convert_row(row_num, &row, resolver)? {
                RowOutcome::Converted(entry) => self.write_entry(&entry, &mut summary)?,
                RowOutcome::Skipped => summary.skipped_rows += 1,
                RowOutcome::Stop => {
                    summary.stopped = true;
                    break;
                }
            }
        }
        summary.learned_payees = self.payees.len() - known_payees;
        info!(
            "{} entries appended, {} hashes known",
            self.ledger.written(),
            self.dedup.len()
        );
        Ok(summary)
    }

    fn convert_row(
        &mut self,
        row_num: usize,
        row: &Row,
        resolver: &mut dyn PayeeResolver,
    ) -> Result<RowOutcome> {
        if row.is_empty() {
            warn!("Empty row detected.");
            return Ok(RowOutcome::Skipped);
        }
        if row_num < self.config.begin {
            return Ok(RowOutcome::Skipped);
        }

        let Some(date) = extract_date(row, row_num, self.config)? else {
            warn!("Empty date detected in row {row_num}.");
            return Ok(RowOutcome::Skipped);
        };

        let raw_payee = extract_raw_payee(row, row_num, &self.config.columns)?;
        debug!("raw payee: {raw_payee}");
        let cleaned = self.cleaner.clean(&raw_payee);
        debug!("cleaned payee: {cleaned}");

        let payee = match resolve_payee(&mut self.payees, cleaned, resolver)? {
            Resolution::Stop => return Ok(RowOutcome::Stop),
            Resolution::Matched(p) | Resolution::Learned(p) | Resolution::Kept(p) => p,
        };

        let amount = extract_amount(row, row_num, self.config)?;
        let entry = Entry::new(date, payee, amount, self.config.account.clone())
            .map_err(|e| e.at_row(row_num))?;
        Ok(RowOutcome::Converted(entry))
    }

    /// Ledger block first, then its hash, so the hash log never names an entry
    /// the ledger lacks.
    fn write_entry(&mut self, entry: &Entry, summary: &mut ImportSummary) -> Result<()> {
        println!(
            "Date: {} | Payee: {} | Amount: {}",
            fmt::date(entry),
            entry.payee(),
            fmt::amount(entry.amount())
        );
        let block = fmt::render_entry(entry);
        let hash = fmt::hash_text(&block);
        if self.dedup.contains(&hash) {
            println!("Info: Entry already exists. Skipping.");
            summary.duplicates += 1;
            return Ok(());
        }
        self.ledger.append(&block)?;
        self.dedup.accept(hash)?;
        summary.imported += 1;
        Ok(())
    }

    /// Write the payee dictionary back. Only called after a clean finish or a
    /// requested stop.
    pub fn finish(self, payees_path: &Path) -> Result<()> {
        self.payees.persist(payees_path)
    }
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

pub fn import_file(
    config: &ImportConfig,
    paths: &ArtifactPaths,
    input: &Path,
    resolver: &mut dyn PayeeResolver,
) -> Result<ImportSummary> {
    let text = load_input(input, config.encoding)?;
    let rows = read_rows(&text, config)?;
    let mut importer = Importer::open(config, paths)?;
    let summary = importer.process_rows(rows, resolver)?;
    importer.finish(&paths.payees)?;
    Ok(summary)
}
