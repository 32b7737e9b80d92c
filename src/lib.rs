//! End-to-end UI test suite for a web point-of-sale application.
//!
//! Layers, leaf first: [`browser`] (locators, the driver trait, a W3C
//! WebDriver client, and the waiting [`BrowserSession`](browser::session::BrowserSession)),
//! [`pages`] (one page object per screen), [`fixture`] (CSV test data),
//! [`scenario`] (the TC_001..TC_017 catalog and its runner), [`report`],
//! and the [`cli`] that wires them together.

pub mod browser;
pub mod cli;
pub mod error;
pub mod fixture;
pub mod pages;
pub mod report;
pub mod scenario;
pub mod trace;
