use tracing::debug;

use crate::browser::session::BrowserSession;
use crate::fixture::data::Fixtures;
use crate::pages::cart::CartPage;
use crate::pages::checkout::CheckoutPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::pages::reports::ReportsPage;
use crate::scenario::scenario_model::{AssertionResult, Halt, StepResult, SuiteSettings};

/// Everything a running scenario touches: the shared browser session, the
/// run settings, fixture lookups, and the assertions recorded so far.
pub struct ScenarioContext<'a> {
    session: &'a BrowserSession,
    settings: &'a SuiteSettings,
    fixtures: &'a Fixtures,

    /// All assertion results collected during execution
    pub assertion_results: Vec<AssertionResult>,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(session: &'a BrowserSession, settings: &'a SuiteSettings, fixtures: &'a Fixtures) -> Self {
        ScenarioContext {
            session,
            settings,
            fixtures,
            assertion_results: Vec::new(),
        }
    }

    pub fn session(&self) -> &'a BrowserSession {
        self.session
    }

    pub fn settings(&self) -> &'a SuiteSettings {
        self.settings
    }

    pub fn fixtures(&self) -> &'a Fixtures {
        self.fixtures
    }

    // ------------------------------------------------------------------
    // Page objects bound to the session
    // ------------------------------------------------------------------

    pub fn login_page(&self) -> LoginPage<'a> {
        LoginPage::new(self.session, &self.settings.base_url)
    }

    pub fn dashboard(&self) -> DashboardPage<'a> {
        DashboardPage::new(self.session)
    }

    pub fn cart(&self) -> CartPage<'a> {
        CartPage::new(self.session)
    }

    pub fn checkout(&self) -> CheckoutPage<'a> {
        CheckoutPage::new(self.session).with_alert_timeout(self.settings.alert_timeout)
    }

    pub fn reports(&self) -> ReportsPage<'a> {
        ReportsPage::new(self.session)
    }

    // ------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------

    /// Record an assertion; halt the scenario when it does not hold.
    pub fn ensure(&mut self, passed: bool, message: impl Into<String>) -> StepResult {
        self.ensure_with_actual(passed, None, message)
    }

    /// Like [`ensure`](Self::ensure), keeping the observed value.
    pub fn ensure_with_actual(
        &mut self,
        passed: bool,
        actual: Option<String>,
        message: impl Into<String>,
    ) -> StepResult {
        let message = message.into();
        debug!(passed, %message, "assertion");
        self.assertion_results.push(AssertionResult {
            description: message.clone(),
            passed,
            actual,
            message: (!passed).then(|| message.clone()),
        });
        if passed { Ok(()) } else { Err(Halt::Assertion(message)) }
    }

    /// Check if all recorded assertions passed.
    pub fn all_passed(&self) -> bool {
        self.assertion_results.iter().all(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| !r.passed).count()
    }

    // ------------------------------------------------------------------
    // Shared steps
    // ------------------------------------------------------------------

    /// Give the UI time to re-render after an interaction.
    pub fn settle(&self) {
        self.session.pause(self.settings.settle);
    }

    /// Sign in with the admin account, optionally requiring the POS
    /// dashboard to be shown afterwards.
    pub fn sign_in(&mut self, require_dashboard: bool) -> StepResult {
        let login = self.login_page();
        login.login(&self.settings.admin_email, &self.settings.admin_password)?;
        let logged_in = login.is_login_successful()?;
        self.ensure(
            logged_in,
            format!(
                "Login should be successful with valid credentials (email: {})",
                self.settings.admin_email
            ),
        )?;

        if require_dashboard {
            let loaded = self.dashboard().is_dashboard_loaded()?;
            self.ensure(loaded, "Dashboard should be loaded after login")?;
        }
        Ok(())
    }

    /// Search for `product` and add the first result to the cart.
    pub fn add_searched_product(&mut self, product: &str) -> StepResult {
        let dashboard = self.dashboard();
        dashboard.search_product(product)?;
        self.settle();

        let found = dashboard.product_items()?.len();
        self.ensure_with_actual(
            found > 0,
            Some(found.to_string()),
            format!("Should find products when searching for '{}' but found {}", product, found),
        )?;

        let added = dashboard.add_first_product_to_cart()?;
        self.ensure(added, format!("Should be able to add {} to cart", product))?;
        self.settle();
        Ok(())
    }
}
