// 💳 Account Entity - ledger record with payable/receivable classification
//
// "The store assigns the id, everything else is a value the caller owns"
//
// - id is assigned by SQLite on insert and never rewritten
// - name, amount and account_type are overwritten wholesale on update
// - account_type is NOT restricted: unknown classifications are kept verbatim

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

/// Classification of an account.
///
/// Serialized as the bare string. Anything other than `payable` or
/// `receivable` lands in `Other` and round-trips unchanged, so rows written
/// by older clients with free-form types are never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    /// Money owed by us (bills, invoices to pay)
    Payable,

    /// Money owed to us
    Receivable,

    /// Unrecognized classification, stored as-is
    Other(String),
}

impl AccountType {
    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Payable => "payable",
            AccountType::Receivable => "receivable",
            AccountType::Other(raw) => raw,
        }
    }

    /// True for `payable` and `receivable`
    pub fn is_known(&self) -> bool {
        !matches!(self, AccountType::Other(_))
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Other(String::new())
    }
}

impl From<String> for AccountType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "payable" => AccountType::Payable,
            "receivable" => AccountType::Receivable,
            _ => AccountType::Other(raw),
        }
    }
}

impl From<&str> for AccountType {
    fn from(raw: &str) -> Self {
        AccountType::from(raw.to_string())
    }
}

impl From<AccountType> for String {
    fn from(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// A persisted account row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Assigned by the store on insert
    pub id: i64,

    pub name: String,

    /// Signed monetary value, no currency unit
    pub amount: f64,

    pub account_type: AccountType,
}

/// Account fields supplied by a client (request body or CSV row).
///
/// Decoding is permissive:
/// - keys match case-insensitively (`Name`, `ACCOUNT_TYPE`, ...)
/// - a missing or `null` field keeps its empty value
/// - unknown keys, including a stray `id`, are ignored
///
/// A field of the wrong type is still a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub amount: f64,
    pub account_type: AccountType,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, amount: f64, account_type: impl Into<AccountType>) -> Self {
        NewAccount {
            name: name.into(),
            amount,
            account_type: account_type.into(),
        }
    }

    /// Stamp an id onto these values
    pub fn with_id(self, id: i64) -> Account {
        Account {
            id,
            name: self.name,
            amount: self.amount,
            account_type: self.account_type,
        }
    }
}

const NEW_ACCOUNT_FIELDS: &[&str] = &["name", "amount", "account_type"];

impl<'de> Deserialize<'de> for NewAccount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_struct("NewAccount", NEW_ACCOUNT_FIELDS, NewAccountVisitor)
    }
}

struct NewAccountVisitor;

impl<'de> Visitor<'de> for NewAccountVisitor {
    type Value = NewAccount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with name, amount and account_type")
    }

    fn visit_map<A>(self, mut map: A) -> Result<NewAccount, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut account = NewAccount::default();

        // Later keys win when the same field appears in several casings
        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "name" => {
                    if let Some(name) = map.next_value::<Option<String>>()? {
                        account.name = name;
                    }
                }
                "amount" => {
                    if let Some(amount) = map.next_value::<Option<f64>>()? {
                        account.amount = amount;
                    }
                }
                "account_type" => {
                    if let Some(account_type) = map.next_value::<Option<AccountType>>()? {
                        account.account_type = account_type;
                    }
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(account)
    }
}

// ============================================================================
// TESTS
// ============================================================================
