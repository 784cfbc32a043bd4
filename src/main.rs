use anyhow::{bail, Result};
use std::env;
use std::path::Path;

use account_ledger::telemetry::init_tracing;
use account_ledger::{
    count_accounts, get_all_accounts, insert_accounts, load_csv, open_database, AccountType, Config,
};

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let Some(csv_path) = args.get(2) else {
                bail!("usage: account-ledger import <file.csv>");
            };
            run_import(&config, Path::new(csv_path))?;
        }
        Some("list") => run_list(&config)?,
        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    println!("account-ledger {}", account_ledger::VERSION);
    println!();
    println!("USAGE:");
    println!("    account-ledger import <file.csv>   Load name,amount,account_type rows");
    println!("    account-ledger list                Print every stored account");
    println!();
    println!("The database path comes from ACCOUNTS_DB_PATH (default: accounts.db).");
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("📂 Loading CSV {:?}...", csv_path);
    let accounts = load_csv(csv_path)?;
    println!("✓ Loaded {} accounts from CSV", accounts.len());

    let conn = open_database(&config.db_path)?;
    println!("✓ Database ready at {:?}", config.db_path);

    let inserted = insert_accounts(&conn, &accounts)?;
    let total = count_accounts(&conn)?;

    println!("✓ Inserted: {} accounts", inserted);
    println!("✓ Database now contains {} accounts", total);

    Ok(())
}

fn run_list(config: &Config) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let accounts = get_all_accounts(&conn)?;

    if accounts.is_empty() {
        println!("No accounts stored in {:?}", config.db_path);
        return Ok(());
    }

    println!("{:>6}  {:<32}  {:>14}  {}", "ID", "NAME", "AMOUNT", "TYPE");
    for account in &accounts {
        println!(
            "{:>6}  {:<32}  {:>14.2}  {}",
            account.id, account.name, account.amount, account.account_type
        );
    }

    let payable: f64 = accounts
        .iter()
        .filter(|a| a.account_type == AccountType::Payable)
        .map(|a| a.amount)
        .sum();
    let receivable: f64 = accounts
        .iter()
        .filter(|a| a.account_type == AccountType::Receivable)
        .map(|a| a.amount)
        .sum();

    println!();
    println!("{} accounts | payable {:.2} | receivable {:.2}", accounts.len(), payable, receivable);

    Ok(())
}
