//! Page objects: one type per screen or modal of the POS application.
//!
//! Each page borrows the run's [`BrowserSession`](crate::browser::session::BrowserSession)
//! and binds its own fixed set of locators to verb-level operations.
//! Mutating operations are guard-then-act: they probe visibility first and
//! report `false` / `None` instead of failing when the element is not shown.

pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod login;
pub mod reports;
