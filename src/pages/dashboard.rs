use tracing::debug;

use crate::browser::driver::ElementRef;
use crate::browser::locator::{Locator, LocatorTemplate, xpath_literal};
use crate::browser::session::BrowserSession;
use crate::error::Result;

// Product search & filter
pub const PRODUCT_SEARCH: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[1]/div[1]/div/div/div/input"#);
pub const CATEGORY_SELECT: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[1]/div[1]/div/select"#);

// Product catalog
pub const PRODUCT_CATALOG: Locator =
    Locator::css(r"div.grid.grid-cols-2.md\:grid-cols-3.lg\:grid-cols-4.gap-4");
pub const PRODUCT_ITEMS: Locator = Locator::css("div.bg-white.rounded-lg.shadow-md.border");
pub const ADD_TO_CART_BUTTON_FIRST: Locator =
    Locator::xpath(r#"//*[@id="root"]/div/main/div/div[1]/div[2]/div/div[1]/div/button"#);
pub const PRODUCT_ADD_BUTTON: LocatorTemplate =
    LocatorTemplate::xpath(r#"//*[@id="root"]/div/main/div/div[1]/div[2]/div/div[{}]/div/button"#);

// Cart rows; the placeholder is the row's 1-based position
pub const CART_ITEM: LocatorTemplate =
    LocatorTemplate::xpath(r#"//*[@id="root"]/div/main/div/div[2]/div/div[2]/div[{}]/div[1]/div[2]"#);

// Navigation
pub const LOGOUT_BUTTON: Locator = Locator::xpath(r#"//*[@id="root"]/div/div/div[3]/button"#);
pub const REPORTS_MENU: Locator = Locator::xpath(r#"//*[@id="root"]/div/div/nav/ul/li[4]/button"#);

/// Locators for the controls of one cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemLocators {
    pub reduce: Locator,
    pub add: Locator,
    pub remove: Locator,
    pub quantity: Locator,
}

impl CartItemLocators {
    /// Controls of the cart row at 0-based `index`.
    pub fn for_index(index: usize) -> Self {
        let row = CART_ITEM.expand(index);
        let at = |suffix: &str| Locator::new(CART_ITEM.by, format!("{}/{}", row, suffix));
        CartItemLocators {
            reduce: at("div/button[1]"),
            add: at("div/button[2]"),
            remove: at("button"),
            quantity: at("div/span"),
        }
    }
}

/// The POS screen: product catalog on the left, cart on the right.
pub struct DashboardPage<'a> {
    session: &'a BrowserSession,
}

impl<'a> DashboardPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    pub fn is_dashboard_loaded(&self) -> Result<bool> {
        Ok(self.session.is_visible(&PRODUCT_CATALOG)? || self.session.is_visible(&PRODUCT_SEARCH)?)
    }

    /// Type into the search box. No-op when the box is not shown.
    pub fn search_product(&self, name: &str) -> Result<bool> {
        self.session.type_if_visible(&PRODUCT_SEARCH, name)
    }

    pub fn product_items(&self) -> Result<Vec<ElementRef>> {
        self.session.find_all(&PRODUCT_ITEMS)
    }

    pub fn select_product_by_index(&self, index: usize) -> Result<bool> {
        let products = self.product_items()?;
        match products.get(index) {
            Some(product) => {
                self.session.driver().click(product)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pick the category whose option text is exactly `category`.
    pub fn select_category(&self, category: &str) -> Result<bool> {
        if !self.session.is_visible(&CATEGORY_SELECT)? {
            return Ok(false);
        }
        let step = format!("option[normalize-space(.)={}]", xpath_literal(category));
        let Some(option) = CATEGORY_SELECT.child(&step) else {
            return Ok(false);
        };
        match self.session.click_when_ready(&option) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                debug!(category, "category option not found");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn add_first_product_to_cart(&self) -> Result<bool> {
        self.session.click_if_visible(&ADD_TO_CART_BUTTON_FIRST)
    }

    /// Locator of the add-to-cart button of the product card at 0-based `index`.
    pub fn product_add_button(index: usize) -> Locator {
        PRODUCT_ADD_BUTTON.at(index)
    }

    pub fn add_product_to_cart_by_index(&self, index: usize) -> Result<bool> {
        self.session.click_if_visible(&Self::product_add_button(index))
    }

    pub fn click_reports_menu(&self) -> Result<bool> {
        self.session.click_if_visible(&REPORTS_MENU)
    }

    pub fn logout(&self) -> Result<bool> {
        self.session.click_if_visible(&LOGOUT_BUTTON)
    }

    pub fn reduce_cart_item_quantity(&self, index: usize) -> Result<bool> {
        self.session.click_if_visible(&CartItemLocators::for_index(index).reduce)
    }

    pub fn increase_cart_item_quantity(&self, index: usize) -> Result<bool> {
        self.session.click_if_visible(&CartItemLocators::for_index(index).add)
    }

    pub fn remove_cart_item(&self, index: usize) -> Result<bool> {
        self.session.click_if_visible(&CartItemLocators::for_index(index).remove)
    }

    pub fn cart_item_quantity_text(&self, index: usize) -> Result<Option<String>> {
        self.session.text_if_visible(&CartItemLocators::for_index(index).quantity)
    }
}
