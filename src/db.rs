use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::entities::{Account, AccountType, NewAccount};

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {:?}", db_path))?;

    // Enable WAL mode for crash recovery
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::debug!(journal_mode = %mode, "database journal mode set");

    setup_database(&conn)?;

    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            account_type TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create accounts table")?;

    Ok(())
}

/// Insert one account, returning the id SQLite assigned to it
pub fn insert_account(conn: &Connection, account: &NewAccount) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts (name, amount, account_type) VALUES (?1, ?2, ?3)",
        params![account.name, account.amount, account.account_type.as_str()],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Insert a batch of accounts one statement at a time.
/// A failure midway leaves the earlier rows in place.
pub fn insert_accounts(conn: &Connection, accounts: &[NewAccount]) -> Result<usize> {
    let mut inserted = 0;

    for account in accounts {
        insert_account(conn, account)
            .with_context(|| format!("Failed to insert account {:?}", account.name))?;
        inserted += 1;
    }

    Ok(inserted)
}

pub fn get_all_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, account_type
         FROM accounts
         ORDER BY id",
    )?;

    let accounts = stmt
        .query_map([], |row| {
            let account_type: String = row.get(3)?;

            Ok(Account {
                id: row.get(0)?,
                name: row.get(1)?,
                amount: row.get(2)?,
                account_type: AccountType::from(account_type),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(accounts)
}

/// Overwrite name, amount and type of the row with `id`.
/// Returns the number of rows touched: 0 when no such id exists.
pub fn update_account(conn: &Connection, id: i64, account: &NewAccount) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE accounts SET name = ?1, amount = ?2, account_type = ?3 WHERE id = ?4",
        params![account.name, account.amount, account.account_type.as_str(), id],
    )?;

    Ok(changed)
}

/// Returns the number of rows removed: 0 when no such id exists.
pub fn delete_account(conn: &Connection, id: i64) -> Result<usize> {
    let removed = conn.execute("DELETE FROM accounts WHERE id = ?1", params![id])?;

    Ok(removed)
}

pub fn count_accounts(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_setup_is_idempotent() {
        let conn = test_conn();
        setup_database(&conn).unwrap();
        assert_eq!(count_accounts(&conn).unwrap(), 0);
    }

    #[test]
    fn test_empty_table_lists_nothing() {
        let conn = test_conn();
        assert!(get_all_accounts(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = test_conn();

        let first = insert_account(&conn, &NewAccount::new("Internet Bill", 100.50, "payable")).unwrap();
        let second = insert_account(&conn, &NewAccount::new("Client A", 320.0, "receivable")).unwrap();

        assert!(first > 0);
        assert!(second > first);

        let accounts = get_all_accounts(&conn).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, first);
        assert_eq!(accounts[0].name, "Internet Bill");
        assert_eq!(accounts[0].amount, 100.50);
        assert_eq!(accounts[0].account_type, AccountType::Payable);
        assert_eq!(accounts[1].account_type, AccountType::Receivable);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let conn = test_conn();

        let first = insert_account(&conn, &NewAccount::new("A", 1.0, "payable")).unwrap();
        delete_account(&conn, first).unwrap();
        let second = insert_account(&conn, &NewAccount::new("B", 2.0, "payable")).unwrap();

        assert!(second > first);
    }

    #[test]
    fn test_unknown_account_type_persisted_verbatim() {
        let conn = test_conn();
        insert_account(&conn, &NewAccount::new("Odd", -3.5, "Loan")).unwrap();

        let accounts = get_all_accounts(&conn).unwrap();
        assert_eq!(accounts[0].account_type, AccountType::Other("Loan".to_string()));
        assert_eq!(accounts[0].amount, -3.5);
    }

    #[test]
    fn test_update_overwrites_and_keeps_id() {
        let conn = test_conn();
        let id = insert_account(&conn, &NewAccount::new("Water Bill", 80.0, "payable")).unwrap();

        let changed = update_account(
            &conn,
            id,
            &NewAccount::new("Updated Water Bill", 90.0, "receivable"),
        )
        .unwrap();
        assert_eq!(changed, 1);

        let accounts = get_all_accounts(&conn).unwrap();
        assert_eq!(
            accounts,
            vec![NewAccount::new("Updated Water Bill", 90.0, "receivable").with_id(id)]
        );
    }

    #[test]
    fn test_update_missing_id_touches_nothing() {
        let conn = test_conn();
        insert_account(&conn, &NewAccount::new("Gas", 40.0, "payable")).unwrap();

        let changed = update_account(&conn, 999, &NewAccount::new("Ghost", 1.0, "payable")).unwrap();
        assert_eq!(changed, 0);

        let accounts = get_all_accounts(&conn).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Gas");
    }

    #[test]
    fn test_delete_reports_rows_removed() {
        let conn = test_conn();
        let id = insert_account(&conn, &NewAccount::new("Phone Bill", 50.0, "payable")).unwrap();

        assert_eq!(delete_account(&conn, id).unwrap(), 1);
        assert_eq!(delete_account(&conn, id).unwrap(), 0);
        assert_eq!(count_accounts(&conn).unwrap(), 0);
    }

    #[test]
    fn test_insert_accounts_batch() {
        let conn = test_conn();
        let batch = vec![
            NewAccount::new("Rent", 1200.0, "payable"),
            NewAccount::new("Invoice 42", 560.25, "receivable"),
            NewAccount::new("Refund", -15.0, "receivable"),
        ];

        assert_eq!(insert_accounts(&conn, &batch).unwrap(), 3);
        assert_eq!(count_accounts(&conn).unwrap(), 3);
    }

    #[test]
    fn test_storage_error_without_table() {
        let conn = Connection::open_in_memory().unwrap();

        assert!(insert_account(&conn, &NewAccount::new("X", 1.0, "payable")).is_err());
        assert!(get_all_accounts(&conn).is_err());
    }

    #[test]
    fn test_open_database_fails_on_unreachable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("accounts.db");

        let err = open_database(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to open database"));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_database_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.db");

        {
            let conn = open_database(&path).unwrap();
            insert_account(&conn, &NewAccount::new("Persisted", 9.99, "payable")).unwrap();
        }

        let conn = open_database(&path).unwrap();
        let accounts = get_all_accounts(&conn).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Persisted");
    }
}
