use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::source::SaleSource;
use crate::types::{SaleFact, SaleWindow};

/// Sale facts stored as a headed CSV file, one row per sale.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_all(&self) -> Result<Vec<SaleFact>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed opening sales CSV: {}", self.path.display()))?;
        read_facts(file).with_context(|| format!("failed reading {}", self.path.display()))
    }
}

impl SaleSource for CsvSource {
    fn fetch_window(&self, window: &SaleWindow) -> Result<Vec<SaleFact>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|fact| window.contains(fact.month_key()))
            .collect())
    }
}

pub fn read_facts<R: Read>(reader: R) -> Result<Vec<SaleFact>> {
    let mut rdr = ::csv::ReaderBuilder::new().trim(::csv::Trim::All).from_reader(reader);
    let mut facts = Vec::new();
    for (idx, row) in rdr.deserialize::<SaleFact>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let fact = row.with_context(|| format!("invalid sale row at line {line}"))?;
        if !fact.month_key().is_valid() {
            bail!("invalid month {} at line {line}", fact.month);
        }
        facts.push(fact);
    }
    Ok(facts)
}
