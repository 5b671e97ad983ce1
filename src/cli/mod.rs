pub mod import;
pub mod prompt;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::Result;
use crate::settings::{ArtifactPaths, Columns, ImportConfig};

#[derive(Parser, Debug)]
#[command(
    name = "csv2ledger",
    version,
    about = "Convert CSV bank exports to plain text accounting entries."
)]
pub struct Cli {
    /// Input CSV file
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Field delimiter
    #[arg(short = 'd', long = "delim", default_value = ";")]
    pub delim: String,

    /// Skip the header line
    #[arg(short = 's', long = "skip")]
    pub skip: bool,

    /// Amounts use a decimal comma
    #[arg(short = 'r', long = "replace-comma")]
    pub replace_comma: bool,

    /// Date format of the input, strftime style
    #[arg(short = 'D', long = "date-format", default_value = "%Y/%m/%d")]
    pub date_format: String,

    /// Column holding the date (1-based)
    #[arg(short = 'c', long = "date-col")]
    pub date_col: usize,

    /// Column holding (part of) the payee; repeat to join several
    #[arg(short = 'p', long = "payee-col", required = true)]
    pub payee_col: Vec<usize>,

    /// Column holding the amount (1-based)
    #[arg(short = 'a', long = "amount-col")]
    pub amount_col: usize,

    /// Start converting at this row number
    #[arg(short = 'b', long = "begin", default_value_t = 0)]
    pub begin: usize,

    /// Ledger file to append to
    #[arg(short = 'l', long = "ledger", env = "LEDGER_FILE")]
    pub ledger: Option<PathBuf>,

    /// Hash file (default: <ledger>.hashes)
    #[arg(short = 'S', long = "hash-file", env = "LEDGER_HASH_FILE")]
    pub hash_file: Option<PathBuf>,

    /// Account the amounts are posted to
    #[arg(short = 'A', long = "account", default_value = "Assets:Checking")]
    pub account: String,

    /// Payee file (default: <ledger>.payees)
    #[arg(short = 'P', long = "payee-file", env = "LEDGER_PAYEE_FILE")]
    pub payee_file: Option<PathBuf>,

    /// Encoding of the input file
    #[arg(short = 'e', long = "encoding", default_value = "utf-8")]
    pub encoding: String,

    /// Template copied into an empty ledger (default: <ledger>.config)
    #[arg(short = 'C', long = "config", env = "LEDGER_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level: debug, info, warning, error
    #[arg(long = "log-level", default_value = "warning")]
    pub log_level: String,

    /// Clean up payees before matching
    #[arg(long = "clean", default_value_t = true, action = ArgAction::Set)]
    pub clean: bool,
}

impl Cli {
    pub fn import_config(&self) -> Result<ImportConfig> {
        Ok(ImportConfig {
            delimiter: ImportConfig::parse_delimiter(&self.delim)?,
            skip_header: self.skip,
            decimal_comma: self.replace_comma,
            date_format: self.date_format.clone(),
            columns: Columns::from_one_based(self.date_col, &self.payee_col, self.amount_col)?,
            begin: self.begin,
            account: self.account.clone(),
            clean: self.clean,
            encoding: self.encoding.parse()?,
        })
    }

    pub fn artifact_paths(&self) -> Result<ArtifactPaths> {
        ArtifactPaths::resolve(
            self.ledger.clone(),
            self.hash_file.clone(),
            self.payee_file.clone(),
            self.config.clone(),
        )
    }
}
