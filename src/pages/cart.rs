use crate::browser::locator::Locator;
use crate::browser::session::BrowserSession;
use crate::error::Result;

pub const CHECKOUT_BUTTON: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[2]/div/div[3]/button"#);

/// Cart panel of the POS screen.
///
/// Row-level controls (add/reduce/remove/quantity) live on
/// [`DashboardPage`](crate::pages::dashboard::DashboardPage), which owns the
/// cart row locators.
pub struct CartPage<'a> {
    session: &'a BrowserSession,
}

impl<'a> CartPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    /// Open the checkout modal.
    pub fn proceed_to_checkout(&self) -> Result<bool> {
        self.session.click_if_visible(&CHECKOUT_BUTTON)
    }
}
