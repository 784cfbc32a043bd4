// CSV import: bulk-load accounts from a headed `name,amount,account_type` file

use anyhow::{Context, Result};
use std::path::Path;

use crate::entities::NewAccount;

pub fn load_csv(csv_path: &Path) -> Result<Vec<NewAccount>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {:?}", csv_path))?;

    let mut accounts = Vec::new();

    for (index, result) in rdr.deserialize::<NewAccount>().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let account: NewAccount =
            result.with_context(|| format!("Failed to deserialize account on line {}", index + 2))?;
        accounts.push(account);
    }

    Ok(accounts)
}
