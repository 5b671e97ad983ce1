use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;

use crate::error::{ImportError, Result};

/// Text encoding of the input export, resolved from a WHATWG label such as
/// `utf-8`, `cp1252` or `iso-8859-15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding(&'static encoding_rs::Encoding);

impl Encoding {
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn is_utf8(&self) -> bool {
        self.0 == encoding_rs::UTF_8
    }

    /// Decode the whole file. Malformed input is an error, never replaced.
    pub fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        self.0
            .decode_without_bom_handling_and_without_replacement(&bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| ImportError::Decode {
                encoding: self.name().to_string(),
            })
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl FromStr for Encoding {
    type Err = ImportError;

    /// Accepts WHATWG labels plus the `latin_1` / `utf_8` spellings.
    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_lowercase();
        [label.clone(), label.replace('_', "-"), label.replace(['_', '-'], "")]
            .iter()
            .find_map(|l| encoding_rs::Encoding::for_label_no_replacement(l.as_bytes()))
            .map(Self)
            .ok_or_else(|| ImportError::UnknownEncoding(s.to_string()))
    }
}

/// 0-based column positions inside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub date: usize,
    pub payees: Vec<usize>,
    pub amount: usize,
}

impl Columns {
    /// Build from the 1-based indices users type on the command line.
    pub fn from_one_based(date: usize, payees: &[usize], amount: usize) -> Result<Self> {
        let to_index = |col: usize| col.checked_sub(1).ok_or(ImportError::InvalidColumn(col));
        Ok(Self {
            date: to_index(date)?,
            payees: payees.iter().map(|&c| to_index(c)).collect::<Result<_>>()?,
            amount: to_index(amount)?,
        })
    }
}

/// Everything a run needs to know about the input, fixed before the first row.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub delimiter: u8,
    pub skip_header: bool,
    pub decimal_comma: bool,
    pub date_format: String,
    pub columns: Columns,
    /// Rows numbered below this are read but not converted.
    pub begin: usize,
    pub account: String,
    pub clean: bool,
    pub encoding: Encoding,
}

impl ImportConfig {
    pub fn parse_delimiter(raw: &str) -> Result<u8> {
        match raw.as_bytes() {
            [b] => Ok(*b),
            _ => Err(ImportError::InvalidDelimiter(raw.to_string())),
        }
    }

    /// Diacritics are folded away for anything that was not exported as UTF-8.
    pub fn strip_diacritics(&self) -> bool {
        !self.encoding.is_utf8()
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: b';',
            skip_header: false,
            decimal_comma: false,
            date_format: "%Y/%m/%d".to_string(),
            columns: Columns {
                date: 0,
                payees: vec![1],
                amount: 2,
            },
            begin: 0,
            account: "Assets:Checking".to_string(),
            clean: true,
            encoding: Encoding::default(),
        }
    }
}

/// Files a run reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub ledger: PathBuf,
    pub hashes: PathBuf,
    pub payees: PathBuf,
    pub template: PathBuf,
}

impl ArtifactPaths {
    /// Fill in any path not given explicitly from the ledger path.
    pub fn resolve(
        ledger: Option<PathBuf>,
        hashes: Option<PathBuf>,
        payees: Option<PathBuf>,
        template: Option<PathBuf>,
    ) -> Result<Self> {
        let ledger = ledger.ok_or(ImportError::MissingLedger)?;
        let hashes = hashes.unwrap_or_else(|| {
            warn!("Hash file not specified and LEDGER_HASH_FILE not set, using default.");
            with_suffix(&ledger, "hashes")
        });
        let payees = payees.unwrap_or_else(|| {
            warn!("Payee file not specified and LEDGER_PAYEE_FILE not set, using default.");
            with_suffix(&ledger, "payees")
        });
        let template = template.unwrap_or_else(|| {
            warn!("Config file not specified and LEDGER_CONFIG_FILE not set, using default.");
            with_suffix(&ledger, "config")
        });
        Ok(Self {
            ledger,
            hashes,
            payees,
            template,
        })
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_convert_to_zero_based() {
        let cols = Columns::from_one_based(1, &[3, 2], 5).unwrap();
        assert_eq!(cols.date, 0);
        assert_eq!(cols.payees, vec![2, 1]);
        assert_eq!(cols.amount, 4);
    }

    #[test]
    fn test_columns_reject_zero() {
        assert!(matches!(
            Columns::from_one_based(0, &[1], 2),
            Err(ImportError::InvalidColumn(0))
        ));
        assert!(Columns::from_one_based(1, &[0], 2).is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(ImportConfig::parse_delimiter(";").unwrap(), b';');
        assert_eq!(ImportConfig::parse_delimiter("\t").unwrap(), b'\t');
        assert!(ImportConfig::parse_delimiter(";;").is_err());
        assert!(ImportConfig::parse_delimiter("").is_err());
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("utf-8".parse::<Encoding>().unwrap(), Encoding::default());
        assert_eq!("UTF8".parse::<Encoding>().unwrap(), Encoding::default());
        assert_eq!("utf_8".parse::<Encoding>().unwrap(), Encoding::default());
        assert_eq!("cp1252".parse::<Encoding>().unwrap().name(), "windows-1252");
        assert_eq!("latin-1".parse::<Encoding>().unwrap().name(), "windows-1252");
        assert_eq!("ISO-8859-15".parse::<Encoding>().unwrap().name(), "ISO-8859-15");
        assert_eq!("shift_jis".parse::<Encoding>().unwrap().name(), "Shift_JIS");
    }

    #[test]
    fn test_unknown_encoding_label() {
        let err = "klingon".parse::<Encoding>().unwrap_err();
        assert!(matches!(err, ImportError::UnknownEncoding(ref name) if name == "klingon"));
        assert!("iso-2022-kr".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_cp1252_decode() {
        let cp1252: Encoding = "cp1252".parse().unwrap();
        assert_eq!(cp1252.decode(vec![0x80, b'5']).unwrap(), "€5");
        assert_eq!(cp1252.decode(vec![b'C', 0xe9, b'z']).unwrap(), "Céz");
    }

    #[test]
    fn test_utf8_decode_rejects_malformed_input() {
        let err = Encoding::default().decode(vec![b'C', 0xe9, b'z']).unwrap_err();
        assert!(matches!(err, ImportError::Decode { ref encoding } if encoding == "UTF-8"));
        assert_eq!(Encoding::default().decode("Café".as_bytes().to_vec()).unwrap(), "Café");
    }

    #[test]
    fn test_strip_diacritics_follows_encoding() {
        let mut config = ImportConfig::default();
        assert!(!config.strip_diacritics());
        config.encoding = "windows-1252".parse().unwrap();
        assert!(config.strip_diacritics());
    }

    #[test]
    fn test_resolve_defaults_from_ledger() {
        let paths =
            ArtifactPaths::resolve(Some("/tmp/main.ledger".into()), None, None, None).unwrap();
        assert_eq!(paths.hashes, PathBuf::from("/tmp/main.ledger.hashes"));
        assert_eq!(paths.payees, PathBuf::from("/tmp/main.ledger.payees"));
        assert_eq!(paths.template, PathBuf::from("/tmp/main.ledger.config"));
    }

    #[test]
    fn test_resolve_keeps_explicit_paths() {
        let paths = ArtifactPaths::resolve(
            Some("main.ledger".into()),
            Some("h.txt".into()),
            Some("p.txt".into()),
            Some("c.txt".into()),
        )
        .unwrap();
        assert_eq!(paths.hashes, PathBuf::from("h.txt"));
        assert_eq!(paths.payees, PathBuf::from("p.txt"));
        assert_eq!(paths.template, PathBuf::from("c.txt"));
    }

    #[test]
    fn test_resolve_requires_ledger() {
        assert!(matches!(
            ArtifactPaths::resolve(None, None, None, None),
            Err(ImportError::MissingLedger)
        ));
    }
}
