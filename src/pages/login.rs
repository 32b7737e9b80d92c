use crate::browser::locator::Locator;
use crate::browser::session::BrowserSession;
use crate::error::Result;

pub const EMAIL_INPUT: Locator = Locator::css("input[type='email']");
pub const PASSWORD_INPUT: Locator = Locator::css("input[type='password']");
pub const LOGIN_BUTTON: Locator = Locator::xpath("//button[@type='submit']");
pub const ERROR_MESSAGE: Locator = Locator::css("div.bg-red-50.border.border-red-200.text-red-600");

/// The sign-in screen the application lands on.
pub struct LoginPage<'a> {
    session: &'a BrowserSession,
    base_url: &'a str,
}

impl<'a> LoginPage<'a> {
    pub fn new(session: &'a BrowserSession, base_url: &'a str) -> Self {
        Self { session, base_url }
    }

    pub fn open(&self) -> Result<()> {
        self.session.navigate(self.base_url)
    }

    pub fn enter_email(&self, email: &str) -> Result<()> {
        self.session.type_into(&EMAIL_INPUT, email)
    }

    pub fn enter_password(&self, password: &str) -> Result<()> {
        self.session.type_into(&PASSWORD_INPUT, password)
    }

    pub fn click_login_button(&self) -> Result<()> {
        self.session.click_when_ready(&LOGIN_BUTTON)
    }

    /// Submit the credentials. The outcome is observed separately through
    /// [`is_login_successful`](Self::is_login_successful) or
    /// [`error_message`](Self::error_message).
    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        self.enter_email(email)?;
        self.enter_password(password)?;
        self.click_login_button()
    }

    /// The browser left the landing URL, or the URL names the POS/dashboard view.
    ///
    /// The marker check runs on the full URL, so a host that itself contains
    /// "pos" always reports success here; pair it with a page-level check.
    pub fn is_login_successful(&self) -> Result<bool> {
        let url = self.session.current_url()?;
        let lowered = url.to_lowercase();
        Ok(lowered.contains("dashboard")
            || lowered.contains("pos")
            || url.trim_end_matches('/') != self.base_url.trim_end_matches('/'))
    }

    pub fn error_message(&self) -> Result<Option<String>> {
        if self.session.is_present(&ERROR_MESSAGE)? {
            return Ok(Some(self.session.text_of(&ERROR_MESSAGE)?));
        }
        Ok(None)
    }

    pub fn is_on_login_page(&self) -> Result<bool> {
        Ok(self.session.is_visible(&LOGIN_BUTTON)? && self.session.is_visible(&EMAIL_INPUT)?)
    }

    pub fn current_url(&self) -> Result<String> {
        self.session.current_url()
    }
}
