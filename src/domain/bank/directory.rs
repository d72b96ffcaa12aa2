//! Bank directory: immutable reference data with name-based lookup.

use serde::{Deserialize, Serialize};

/// Contact details for a supported bank.
///
/// # Invariants
///
/// - `id` is unique within a directory
/// - Fields never change after the directory is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Short stable identifier (e.g. "gb001").
    id: String,

    /// Display name users refer to the bank by.
    name: String,

    /// Customer service email address.
    contact_email: String,

    /// Customer service phone number.
    contact_phone: String,
}

impl Bank {
    /// Creates a new bank entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        contact_email: impl Into<String>,
        contact_phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contact_email: contact_email.into(),
            contact_phone: contact_phone.into(),
        }
    }

    /// Returns the bank id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the customer service email address.
    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    /// Returns the customer service phone number.
    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }
}

/// Read-only directory of supported banks.
///
/// Built at process start and safely shared across sessions; lookups never
/// mutate it.
#[derive(Debug, Clone)]
pub struct BankDirectory {
    banks: Vec<Bank>,
}

impl BankDirectory {
    /// Creates a directory from a list of banks.
    pub fn new(banks: Vec<Bank>) -> Self {
        Self { banks }
    }

    /// The built-in roster of supported banks.
    pub fn builtin() -> Self {
        Self::new(vec![
            Bank::new("gb001", "GlobalBank", "support@globalbank.com", "1-800-123-4567"),
            Bank::new("cf002", "CityFinance", "help@cityfinance.com", "1-888-765-4321"),
            Bank::new("nt003", "NationalTrust", "care@nationaltrust.com", "1-877-987-6543"),
            Bank::new("mc004", "MetroCredit", "support@metrocredit.com", "1-866-555-1212"),
            Bank::new("ub005", "UnionBank", "customerservice@unionbank.com", "1-855-999-8888"),
        ])
    }

    /// Finds a bank by display name, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&Bank> {
        let needle = name.trim();
        self.banks
            .iter()
            .find(|bank| bank.name.eq_ignore_ascii_case(needle))
    }

    /// Finds a bank by id.
    pub fn find_by_id(&self, id: &str) -> Option<&Bank> {
        self.banks.iter().find(|bank| bank.id == id)
    }

    /// Returns all banks in directory order.
    pub fn all(&self) -> &[Bank] {
        &self.banks
    }

    /// Returns the number of banks in the directory.
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    /// Returns true if the directory has no banks.
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Renders the roster as context lines for the system prompt.
    pub fn prompt_context(&self) -> String {
        self.banks
            .iter()
            .map(|bank| {
                format!(
                    "Bank Name: {}, Email: {}, Phone: {}",
                    bank.name, bank.contact_email, bank.contact_phone
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for BankDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
