use serde::{Deserialize, Serialize};

/// The part an account plays in a day's sales piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Clients,
    StandardTax,
    ReducedTax,
    StandardSales,
    ReducedSales,
    Shipping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub code: String,
    pub label: String,
}

impl Account {
    pub fn new(code: &str, label: &str) -> Account {
        Account {
            code: code.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOfAccounts {
    pub clients: Account,
    pub standard_tax: Account,
    pub reduced_tax: Account,
    pub standard_sales: Account,
    pub reduced_sales: Account,
    pub shipping: Account,
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        ChartOfAccounts {
            clients: Account::new("411200000", "Clients"),
            standard_tax: Account::new("445712000", "TVA 20%"),
            reduced_tax: Account::new("445710500", "TVA 5,5%"),
            standard_sales: Account::new("707000011", "Ventes marchandises TVA normale"),
            reduced_sales: Account::new("707000012", "Ventes produits finis TVA reduite"),
            shipping: Account::new("708500011", "Ports et frais accessoires factures"),
        }
    }
}

impl ChartOfAccounts {
    pub fn account(&self, role: AccountRole) -> &Account {
        match role {
            AccountRole::Clients => &self.clients,
            AccountRole::StandardTax => &self.standard_tax,
            AccountRole::ReducedTax => &self.reduced_tax,
            AccountRole::StandardSales => &self.standard_sales,
            AccountRole::ReducedSales => &self.reduced_sales,
            AccountRole::Shipping => &self.shipping,
        }
    }
}
