use serde::{Deserialize, Serialize};

use crate::browser::locator::Locator;
use crate::error::Result;

/// Opaque handle to a DOM element, as issued by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl ElementRef {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// The capability set the suite needs from a browser automation driver.
///
/// Every call is a single, non-waiting command: waiting and retrying is the
/// job of [`BrowserSession`](crate::browser::session::BrowserSession).
/// Methods take `&self`; one driver is used from one thread at a time.
pub trait BrowserDriver {
    fn navigate(&self, url: &str) -> Result<()>;

    fn current_url(&self) -> Result<String>;

    fn title(&self) -> Result<String>;

    /// All elements currently matching `locator`; empty when none match.
    fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>>;

    fn is_displayed(&self, element: &ElementRef) -> Result<bool>;

    fn is_enabled(&self, element: &ElementRef) -> Result<bool>;

    fn click(&self, element: &ElementRef) -> Result<()>;

    fn clear(&self, element: &ElementRef) -> Result<()>;

    fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

    fn text(&self, element: &ElementRef) -> Result<String>;

    fn delete_all_cookies(&self) -> Result<()>;

    fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    fn alert_text(&self) -> Result<String>;

    fn accept_alert(&self) -> Result<()>;

    fn dismiss_alert(&self) -> Result<()>;

    /// PNG bytes of the current viewport.
    fn screenshot(&self) -> Result<Vec<u8>>;

    fn quit(&self) -> Result<()>;
}
