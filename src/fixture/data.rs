use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SuiteError};

/// Column every fixture table is keyed by.
pub const TEST_CASE_COLUMN: &str = "test_case";

pub const LOGIN_DATA: &str = "login_test_data.csv";
pub const PRODUCT_SEARCH_DATA: &str = "product_search_data.csv";
pub const CART_DATA: &str = "cart_test_data.csv";
pub const CHECKOUT_DATA: &str = "checkout_test_data.csv";
pub const REPORTS_DATA: &str = "reports_test_data.csv";

// ============================================================================
// Raw tables
// ============================================================================

/// One CSV row: header name to cell value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixtureRecord {
    fields: Vec<(String, String)>,
}

impl FixtureRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of a column that the calling scenario requires.
    pub fn field(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| SuiteError::FixtureField {
            case: self.case_name().unwrap_or_default().to_string(),
            field: name.to_string(),
        })
    }

    pub fn case_name(&self) -> Option<&str> {
        self.get(TEST_CASE_COLUMN)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }
}

/// A whole fixture file. The header row names the columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureTable {
    /// Label used in "test case not found" errors, e.g. "Cart".
    pub label: String,
    pub records: Vec<FixtureRecord>,
}

impl FixtureTable {
    pub fn load(path: &Path, label: &str) -> Result<Self> {
        let wrap = |source: csv::Error| SuiteError::FixtureFile {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(wrap)?;
        let headers = reader.headers().map_err(wrap)?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(wrap)?;
            let fields = headers
                .iter()
                .zip(row.iter())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();
            records.push(FixtureRecord::new(fields));
        }

        debug!(path = %path.display(), rows = records.len(), "fixture table loaded");
        Ok(Self {
            label: label.to_string(),
            records,
        })
    }

    /// First row whose `test_case` column equals `name`.
    pub fn case(&self, name: &str) -> Result<&FixtureRecord> {
        self.records
            .iter()
            .find(|record| record.case_name() == Some(name))
            .ok_or_else(|| SuiteError::FixtureCaseNotFound {
                table: self.label.clone(),
                case: name.to_string(),
            })
    }
}

// ============================================================================
// Typed cases
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCase {
    pub email: String,
    pub password: String,
    pub expected_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCase {
    pub product_name: String,
    pub category: String,
    pub expected_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartCase {
    pub product_name: String,
    /// Quantity the first cart row should show afterwards, when checked.
    pub expected_quantity: Option<String>,
    pub expected_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCase {
    pub customer_name: String,
    pub customer_email: String,
    pub payment_method: String,
    pub notes: String,
    pub expected_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportsCase {
    pub expected_total_sales: String,
    pub expected_transactions: String,
    pub expected_average_order: String,
    pub expected_top_products_count: String,
    pub expected_product: Option<String>,
}

/// Typed lookups over the fixture directory.
///
/// Tables are re-read on every lookup; nothing is cached between scenarios.
#[derive(Debug, Clone)]
pub struct Fixtures {
    data_dir: PathBuf,
}

impl Fixtures {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table(&self, file: &str, label: &str) -> Result<FixtureTable> {
        FixtureTable::load(&self.data_dir.join(file), label)
    }

    /// The raw row of `file` keyed by `case`.
    pub fn record(&self, file: &str, label: &str, case: &str) -> Result<FixtureRecord> {
        Ok(self.table(file, label)?.case(case)?.clone())
    }

    pub fn login(&self, case: &str) -> Result<LoginCase> {
        let row = self.record(LOGIN_DATA, "Login", case)?;
        Ok(LoginCase {
            email: row.field("email")?.to_string(),
            password: row.field("password")?.to_string(),
            expected_result: row.field("expected_result")?.to_string(),
        })
    }

    pub fn search(&self, case: &str) -> Result<SearchCase> {
        let row = self.record(PRODUCT_SEARCH_DATA, "Search", case)?;
        Ok(SearchCase {
            product_name: row.field("product_name")?.to_string(),
            category: row.field("category")?.to_string(),
            expected_result: row.field("expected_result")?.to_string(),
        })
    }

    pub fn cart(&self, case: &str) -> Result<CartCase> {
        let row = self.record(CART_DATA, "Cart", case)?;
        Ok(CartCase {
            product_name: row.field("product_name")?.to_string(),
            expected_quantity: non_empty(row.get("expected_quantity")),
            expected_result: row.field("expected_result")?.to_string(),
        })
    }

    pub fn checkout(&self, case: &str) -> Result<CheckoutCase> {
        let row = self.record(CHECKOUT_DATA, "Checkout", case)?;
        Ok(CheckoutCase {
            customer_name: row.field("customer_name")?.to_string(),
            customer_email: row.field("customer_email")?.to_string(),
            payment_method: row.field("payment_method")?.to_string(),
            notes: row.field("notes")?.to_string(),
            expected_result: row.field("expected_result")?.to_string(),
        })
    }

    pub fn reports(&self, case: &str) -> Result<ReportsCase> {
        let row = self.record(REPORTS_DATA, "Reports", case)?;
        Ok(ReportsCase {
            expected_total_sales: row.field("expected_total_sales")?.to_string(),
            expected_transactions: row.field("expected_transactions")?.to_string(),
            expected_average_order: row.field("expected_average_order")?.to_string(),
            expected_top_products_count: row.field("expected_top_products_count")?.to_string(),
            expected_product: non_empty(row.get("expected_product")),
        })
    }
}

/// Optional columns: a missing column and a blank cell both mean "not set".
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
