use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::browser::locator::Locator;
use crate::browser::session::BrowserSession;
use crate::error::Result;

pub const CUSTOMER_NAME_INPUT: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[3]/div/form/div[2]/div[1]/input"#);
pub const CUSTOMER_EMAIL_INPUT: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[3]/div/form/div[2]/div[2]/input"#);
pub const PAYMENT_CARD_BUTTON: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[3]/div/form/div[3]/div/button[2]"#);
pub const NOTES_TEXTAREA: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[3]/div/form/div[4]/textarea"#);
pub const CANCEL_BUTTON: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[3]/div/form/div[5]/button[1]"#);
pub const COMPLETE_TRANSACTION_BUTTON: Locator = Locator::css(r#"button[type="submit"]"#);

/// Phrase the application's confirmation alert carries on success.
pub const SUCCESS_PHRASE: &str = "Transaction completed successfully";

/// How long to wait for the confirmation alert after submitting.
pub const ALERT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-step outcome of filling the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFill {
    pub name: bool,
    pub email: bool,
    pub payment: bool,
    pub notes: bool,
}

impl FormFill {
    pub fn all(&self) -> bool {
        self.name && self.email && self.payment && self.notes
    }
}

/// Why a checkout attempt did not complete. The variants are mutually
/// exclusive and listed in the order the flow reaches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutFailure {
    FormFill,
    SubmitClick,
    AlertTimeout,
    AlertAccept,
    UnexpectedMessage(Option<String>),
}

impl fmt::Display for CheckoutFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutFailure::FormFill => write!(f, "Failed to fill checkout form"),
            CheckoutFailure::SubmitClick => {
                write!(f, "Failed to click Complete Transaction button")
            }
            CheckoutFailure::AlertTimeout => write!(f, "Success alert did not appear"),
            CheckoutFailure::AlertAccept => write!(f, "Failed to accept success alert"),
            CheckoutFailure::UnexpectedMessage(text) => write!(
                f,
                "Unexpected alert message: {}",
                text.as_deref().unwrap_or("None")
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The transaction went through; holds the confirmation alert text.
    Completed(String),
    Failed(CheckoutFailure),
}

impl CheckoutOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CheckoutOutcome::Completed(_))
    }

    /// Alert text on success, diagnostic otherwise.
    pub fn message(&self) -> String {
        match self {
            CheckoutOutcome::Completed(text) => text.clone(),
            CheckoutOutcome::Failed(failure) => failure.to_string(),
        }
    }

    pub fn into_pair(self) -> (bool, String) {
        (self.success(), self.message())
    }
}

/// The checkout modal opened from the cart.
pub struct CheckoutPage<'a> {
    session: &'a BrowserSession,
    alert_timeout: Duration,
}

impl<'a> CheckoutPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self {
            session,
            alert_timeout: ALERT_TIMEOUT,
        }
    }

    pub fn with_alert_timeout(mut self, timeout: Duration) -> Self {
        self.alert_timeout = timeout;
        self
    }

    /// The modal is open when its customer-name field is shown.
    pub fn is_checkout_modal_open(&self) -> Result<bool> {
        self.session.is_visible(&CUSTOMER_NAME_INPUT)
    }

    pub fn enter_customer_name(&self, name: &str) -> Result<bool> {
        self.session.type_if_visible(&CUSTOMER_NAME_INPUT, name)
    }

    pub fn enter_customer_email(&self, email: &str) -> Result<bool> {
        self.session.type_if_visible(&CUSTOMER_EMAIL_INPUT, email)
    }

    pub fn select_card_payment(&self) -> Result<bool> {
        self.session.click_if_visible(&PAYMENT_CARD_BUTTON)
    }

    pub fn enter_notes(&self, notes: &str) -> Result<bool> {
        self.session.type_if_visible(&NOTES_TEXTAREA, notes)
    }

    pub fn click_complete_transaction(&self) -> Result<bool> {
        self.session.click_if_visible(&COMPLETE_TRANSACTION_BUTTON)
    }

    pub fn click_cancel(&self) -> Result<bool> {
        self.session.click_if_visible(&CANCEL_BUTTON)
    }

    /// Fill every field of the form. Each step runs even if an earlier one
    /// failed, so the result shows every field that could not be filled.
    pub fn fill_checkout_form(&self, name: &str, email: &str, notes: &str) -> Result<FormFill> {
        let fill = FormFill {
            name: self.enter_customer_name(name)?,
            email: self.enter_customer_email(email)?,
            payment: self.select_card_payment()?,
            notes: self.enter_notes(notes)?,
        };
        debug!(?fill, "checkout form filled");
        Ok(fill)
    }

    /// Fill the form, submit it, and acknowledge the confirmation alert.
    pub fn complete_checkout_transaction(
        &self,
        name: &str,
        email: &str,
        notes: &str,
    ) -> Result<CheckoutOutcome> {
        let outcome = self.run_checkout(name, email, notes)?;
        info!(success = outcome.success(), message = %outcome.message(), "checkout finished");
        Ok(outcome)
    }

    fn run_checkout(&self, name: &str, email: &str, notes: &str) -> Result<CheckoutOutcome> {
        if !self.fill_checkout_form(name, email, notes)?.all() {
            return Ok(CheckoutOutcome::Failed(CheckoutFailure::FormFill));
        }
        if !self.click_complete_transaction()? {
            return Ok(CheckoutOutcome::Failed(CheckoutFailure::SubmitClick));
        }
        if !self.session.wait_for_alert(self.alert_timeout) {
            return Ok(CheckoutOutcome::Failed(CheckoutFailure::AlertTimeout));
        }

        let text = self.session.alert_text();
        if !self.session.accept_alert() {
            return Ok(CheckoutOutcome::Failed(CheckoutFailure::AlertAccept));
        }

        Ok(match text {
            Some(text) if text.contains(SUCCESS_PHRASE) => CheckoutOutcome::Completed(text),
            other => CheckoutOutcome::Failed(CheckoutFailure::UnexpectedMessage(other)),
        })
    }
}
