use serde::{Deserialize, Serialize};

use crate::browser::locator::Locator;
use crate::browser::session::BrowserSession;
use crate::error::Result;

pub const REPORTS_HEADING: Locator = Locator::css("h1.text-2xl.font-semibold.text-gray-900");
pub const TOTAL_SALES_VALUE: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[2]/div[1]/div/div[2]/p[2]"#);
pub const TRANSACTIONS_VALUE: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[2]/div[2]/div/div[2]/p[2]"#);
pub const AVERAGE_ORDER_VALUE: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[2]/div[3]/div/div[2]/p[2]"#);
pub const TOP_PRODUCTS_COUNT: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[2]/div[4]/div/div[2]/p[2]"#);
pub const TOP_PRODUCTS_LIST: Locator = Locator::xpath(
    "//h3[contains(text(), 'Top Products')]/following-sibling::div//p[@class='font-medium text-gray-900']",
);

pub const EXPECTED_HEADING: &str = "Sales Reports";

/// The four headline numbers shown on the reports page, as rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub total_sales: Option<String>,
    pub transactions: Option<String>,
    pub average_order: Option<String>,
    pub top_products_count: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedReport {
    pub total_sales: String,
    pub transactions: String,
    pub average_order: String,
    pub top_products_count: String,
    pub product: Option<String>,
}

/// Per-check outcome of [`ReportsPage::verify_reports_data`], with the raw
/// values kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportsVerification {
    pub page_loaded: bool,
    pub correct_heading: bool,
    pub total_sales_match: bool,
    pub transactions_match: bool,
    pub average_order_match: bool,
    pub top_products_count_match: bool,
    /// Only checked when an expected product was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_in_list: Option<bool>,
    pub actual_values: ReportMetrics,
    pub expected_values: ExpectedReport,
}

impl ReportsVerification {
    pub fn all_passed(&self) -> bool {
        self.failures().is_empty()
    }

    /// One message per failed check, naming expected and actual values.
    pub fn failures(&self) -> Vec<String> {
        let actual = &self.actual_values;
        let expected = &self.expected_values;
        let shown = |v: &Option<String>| v.clone().unwrap_or_else(|| "<missing>".into());

        let mut out = Vec::new();
        if !self.page_loaded {
            out.push("Reports page is not loaded".to_string());
        }
        if !self.correct_heading {
            out.push(format!("Heading is not '{}'", EXPECTED_HEADING));
        }
        let metrics = [
            ("Total sales", self.total_sales_match, &expected.total_sales, &actual.total_sales),
            ("Transactions", self.transactions_match, &expected.transactions, &actual.transactions),
            ("Average order", self.average_order_match, &expected.average_order, &actual.average_order),
            (
                "Top products count",
                self.top_products_count_match,
                &expected.top_products_count,
                &actual.top_products_count,
            ),
        ];
        for (label, matched, want, got) in metrics {
            if !matched {
                out.push(format!("{}: expected {}, got {}", label, want, shown(got)));
            }
        }
        if self.product_in_list == Some(false) {
            out.push(format!(
                "Product '{}' not in Top Products",
                expected.product.as_deref().unwrap_or_default()
            ));
        }
        out
    }
}

/// The Sales Reports page.
pub struct ReportsPage<'a> {
    session: &'a BrowserSession,
}

impl<'a> ReportsPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    pub fn is_on_reports_page(&self) -> Result<bool> {
        self.session.is_visible(&REPORTS_HEADING)
    }

    pub fn heading_text(&self) -> Result<Option<String>> {
        self.session.text_if_visible(&REPORTS_HEADING)
    }

    pub fn total_sales(&self) -> Result<Option<String>> {
        self.session.text_if_visible(&TOTAL_SALES_VALUE)
    }

    pub fn transactions_count(&self) -> Result<Option<String>> {
        self.session.text_if_visible(&TRANSACTIONS_VALUE)
    }

    pub fn average_order(&self) -> Result<Option<String>> {
        self.session.text_if_visible(&AVERAGE_ORDER_VALUE)
    }

    pub fn top_products_count(&self) -> Result<Option<String>> {
        self.session.text_if_visible(&TOP_PRODUCTS_COUNT)
    }

    pub fn all_metrics(&self) -> Result<ReportMetrics> {
        Ok(ReportMetrics {
            total_sales: self.total_sales()?,
            transactions: self.transactions_count()?,
            average_order: self.average_order()?,
            top_products_count: self.top_products_count()?,
        })
    }

    /// Names listed under "Top Products". Entries that detach while being
    /// read are skipped.
    pub fn top_products(&self) -> Result<Vec<String>> {
        let driver = self.session.driver();
        let mut names = Vec::new();
        for element in self.session.find_all(&TOP_PRODUCTS_LIST)? {
            match driver.text(&element) {
                Ok(text) => names.push(text),
                Err(e) if e.is_transient() => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(names)
    }

    /// Case-insensitive substring match against the Top Products list.
    pub fn is_product_in_top_products(&self, product: &str) -> Result<bool> {
        let needle = product.to_lowercase();
        Ok(self
            .top_products()?
            .iter()
            .any(|name| name.to_lowercase().contains(&needle)))
    }

    pub fn verify_reports_data(
        &self,
        expected_total_sales: &str,
        expected_transactions: &str,
        expected_average_order: &str,
        expected_top_products_count: &str,
        expected_product: Option<&str>,
    ) -> Result<ReportsVerification> {
        let page_loaded = self.is_on_reports_page()?;
        let correct_heading = self.heading_text()?.as_deref() == Some(EXPECTED_HEADING);
        let actual = self.all_metrics()?;

        let product_in_list = match expected_product.filter(|p| !p.is_empty()) {
            Some(product) => Some(self.is_product_in_top_products(product)?),
            None => None,
        };

        Ok(ReportsVerification {
            page_loaded,
            correct_heading,
            total_sales_match: actual.total_sales.as_deref() == Some(expected_total_sales),
            transactions_match: actual.transactions.as_deref() == Some(expected_transactions),
            average_order_match: actual.average_order.as_deref() == Some(expected_average_order),
            top_products_count_match: actual.top_products_count.as_deref()
                == Some(expected_top_products_count),
            product_in_list,
            actual_values: actual,
            expected_values: ExpectedReport {
                total_sales: expected_total_sales.to_string(),
                transactions: expected_transactions.to_string(),
                average_order: expected_average_order.to_string(),
                top_products_count: expected_top_products_count.to_string(),
                product: expected_product.map(str::to_string),
            },
        })
    }
}
