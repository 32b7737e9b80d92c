use pos_ui_suite::browser::locator::{Locator, xpath_literal};
use pos_ui_suite::pages::{cart, checkout, dashboard, login, reports};

use crate::common::fake_browser::{FakeApp, FakeElement};

pub const BASE_URL: &str = "http://shop.test/";
pub const ADMIN_EMAIL: &str = "admin@pos.com";
pub const ADMIN_PASSWORD: &str = "admin";

pub const CATEGORIES: [&str; 5] = ["All Categories", "Electronics", "Books", "Kitchen", "Home"];

#[derive(Debug, Clone)]
pub struct Product {
    pub name: &'static str,
    pub category: &'static str,
    pub price_cents: u64,
}

pub fn default_products() -> Vec<Product> {
    vec![
        Product { name: "Wireless Headphones", category: "Electronics", price_cents: 9999 },
        Product { name: "Programming Book", category: "Books", price_cents: 3999 },
        Product { name: "Coffee Mug", category: "Kitchen", price_cents: 1299 },
        Product { name: "USB-C Cable", category: "Electronics", price_cents: 1999 },
        Product { name: "Desk Lamp", category: "Home", price_cents: 4599 },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Pos,
    Reports,
}

/// In-memory rendition of the POS web application.
///
/// Renders the same locators the page objects look for, so scenarios run
/// against it exactly as they would against the deployed app. State that
/// the real app keeps in browser storage (session, cart, transactions) is
/// wiped by `clear_storage`.
pub struct PosApp {
    pub screen: Screen,
    pub products: Vec<Product>,
    pub email: String,
    pub password: String,
    pub login_error: bool,
    pub logged_in: bool,
    pub search: String,
    pub category: String,
    /// (product index, quantity)
    pub cart: Vec<(usize, u32)>,
    pub checkout_open: bool,
    pub customer_name: String,
    pub customer_email: String,
    pub card_selected: bool,
    pub notes: String,
    pub alert: Option<String>,
    /// Completed transactions: (product index, quantity) lines.
    pub transactions: Vec<Vec<(usize, u32)>>,
    /// When false the confirmation alert never opens.
    pub confirms_checkout: bool,
    /// When false the reports page renders without its heading.
    pub shows_reports_heading: bool,
}

impl Default for PosApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PosApp {
    pub fn new() -> Self {
        PosApp {
            screen: Screen::Login,
            products: default_products(),
            email: String::new(),
            password: String::new(),
            login_error: false,
            logged_in: false,
            search: String::new(),
            category: CATEGORIES[0].to_string(),
            cart: Vec::new(),
            checkout_open: false,
            customer_name: String::new(),
            customer_email: String::new(),
            card_selected: false,
            notes: String::new(),
            alert: None,
            transactions: Vec::new(),
            confirms_checkout: true,
            shows_reports_heading: true,
        }
    }

    /// Indices of the products the catalog currently shows.
    pub fn visible_products(&self) -> Vec<usize> {
        let needle = self.search.to_lowercase();
        self.products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.name.to_lowercase().contains(&needle))
            .filter(|(_, p)| self.category == CATEGORIES[0] || p.category == self.category)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn quantity_of(&self, product: &str) -> Option<u32> {
        self.cart
            .iter()
            .find(|(i, _)| self.products[*i].name == product)
            .map(|(_, qty)| *qty)
    }

    fn add_to_cart(&mut self, product: usize) {
        match self.cart.iter_mut().find(|(i, _)| *i == product) {
            Some((_, qty)) => *qty += 1,
            None => self.cart.push((product, 1)),
        }
    }

    fn reset_form(&mut self) {
        self.customer_name.clear();
        self.customer_email.clear();
        self.card_selected = false;
        self.notes.clear();
    }

    fn complete_transaction(&mut self) {
        if !self.confirms_checkout {
            return;
        }
        if self.customer_name.is_empty() || self.customer_email.is_empty() || !self.card_selected {
            self.alert = Some("Please fill in all required fields".to_string());
            return;
        }
        let total = self.cart_total(&self.cart);
        self.transactions.push(std::mem::take(&mut self.cart));
        self.checkout_open = false;
        self.reset_form();
        self.alert = Some(format!(
            "Transaction completed successfully! Total: {}",
            money(total)
        ));
    }

    fn cart_total(&self, lines: &[(usize, u32)]) -> u64 {
        lines
            .iter()
            .map(|(i, qty)| self.products[*i].price_cents * u64::from(*qty))
            .sum()
    }

    fn total_sales(&self) -> u64 {
        self.transactions.iter().map(|t| self.cart_total(t)).sum()
    }

    fn sold_products(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for line in self.transactions.iter().flatten() {
            let name = self.products[line.0].name;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn category_option(category: &str) -> Option<Locator> {
        dashboard::CATEGORY_SELECT.child(&format!(
            "option[normalize-space(.)={}]",
            xpath_literal(category)
        ))
    }

    fn render_login(&self, out: &mut Vec<FakeElement>) {
        out.push(FakeElement::new("email", login::EMAIL_INPUT));
        out.push(FakeElement::new("password", login::PASSWORD_INPUT));
        out.push(FakeElement::new("login", login::LOGIN_BUTTON));
        if self.login_error {
            out.push(
                FakeElement::new("login-error", login::ERROR_MESSAGE)
                    .text("Invalid credentials. Please try again."),
            );
        }
    }

    fn render_nav(&self, out: &mut Vec<FakeElement>) {
        out.push(FakeElement::new("logout", dashboard::LOGOUT_BUTTON));
        out.push(FakeElement::new("reports-menu", dashboard::REPORTS_MENU));
    }

    fn render_pos(&self, out: &mut Vec<FakeElement>) {
        out.push(FakeElement::new("search", dashboard::PRODUCT_SEARCH));
        out.push(FakeElement::new("category", dashboard::CATEGORY_SELECT));
        for category in CATEGORIES {
            if let Some(locator) = Self::category_option(category) {
                out.push(FakeElement::new(&format!("category:{}", category), locator).text(category));
            }
        }

        out.push(FakeElement::new("catalog", dashboard::PRODUCT_CATALOG));
        for (position, product) in self.visible_products().into_iter().enumerate() {
            out.push(
                FakeElement::new(&format!("product:{}", product), dashboard::PRODUCT_ITEMS)
                    .text(self.products[product].name),
            );
            out.push(FakeElement::new(
                &format!("add:{}", position),
                dashboard::PRODUCT_ADD_BUTTON.at(position),
            ));
        }

        for (row, (_, qty)) in self.cart.iter().enumerate() {
            let controls = dashboard::CartItemLocators::for_index(row);
            out.push(FakeElement::new(&format!("cart:{}:reduce", row), controls.reduce));
            out.push(FakeElement::new(&format!("cart:{}:add", row), controls.add));
            out.push(FakeElement::new(&format!("cart:{}:remove", row), controls.remove));
            out.push(FakeElement::new(&format!("cart:{}:quantity", row), controls.quantity).text(&qty.to_string()));
        }
        if !self.cart.is_empty() {
            out.push(FakeElement::new("checkout", cart::CHECKOUT_BUTTON));
        }

        if self.checkout_open {
            out.push(FakeElement::new("customer-name", checkout::CUSTOMER_NAME_INPUT));
            out.push(FakeElement::new("customer-email", checkout::CUSTOMER_EMAIL_INPUT));
            out.push(FakeElement::new("card", checkout::PAYMENT_CARD_BUTTON));
            out.push(FakeElement::new("notes", checkout::NOTES_TEXTAREA));
            out.push(FakeElement::new("cancel", checkout::CANCEL_BUTTON));
            out.push(FakeElement::new("complete", checkout::COMPLETE_TRANSACTION_BUTTON));
        }
    }

    fn render_reports(&self, out: &mut Vec<FakeElement>) {
        let count = self.transactions.len() as u64;
        let total = self.total_sales();
        let average = if count == 0 { 0 } else { total / count };
        let sold = self.sold_products();

        if self.shows_reports_heading {
            out.push(FakeElement::new("reports-heading", reports::REPORTS_HEADING).text("Sales Reports"));
        }
        out.push(FakeElement::new("total-sales", reports::TOTAL_SALES_VALUE).text(&money(total)));
        out.push(FakeElement::new("transactions", reports::TRANSACTIONS_VALUE).text(&count.to_string()));
        out.push(FakeElement::new("average-order", reports::AVERAGE_ORDER_VALUE).text(&money(average)));
        out.push(
            FakeElement::new("top-products-count", reports::TOP_PRODUCTS_COUNT)
                .text(&sold.len().to_string()),
        );
        for (i, name) in sold.into_iter().enumerate() {
            out.push(FakeElement::new(&format!("top:{}", i), reports::TOP_PRODUCTS_LIST).text(name));
        }
    }
}

/// `9999` -> `"$99.99"`
pub fn money(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

impl FakeApp for PosApp {
    fn url(&self) -> String {
        match self.screen {
            Screen::Login => BASE_URL.to_string(),
            Screen::Pos => format!("{}pos", BASE_URL),
            Screen::Reports => format!("{}reports", BASE_URL),
        }
    }

    fn title(&self) -> String {
        "Simple POS".to_string()
    }

    fn navigate(&mut self, _url: &str) {
        self.screen = if self.logged_in { Screen::Pos } else { Screen::Login };
        self.login_error = false;
    }

    fn elements(&mut self) -> Vec<FakeElement> {
        let mut out = Vec::new();
        match self.screen {
            Screen::Login => self.render_login(&mut out),
            Screen::Pos => {
                self.render_nav(&mut out);
                self.render_pos(&mut out);
            }
            Screen::Reports => {
                self.render_nav(&mut out);
                self.render_reports(&mut out);
            }
        }
        out
    }

    fn click(&mut self, id: &str) {
        let parts: Vec<&str> = id.split(':').collect();
        match parts.as_slice() {
            ["login"] => {
                if self.email == ADMIN_EMAIL && self.password == ADMIN_PASSWORD {
                    self.logged_in = true;
                    self.login_error = false;
                    self.screen = Screen::Pos;
                } else {
                    self.login_error = true;
                }
            }
            ["logout"] => {
                self.logged_in = false;
                self.screen = Screen::Login;
                self.email.clear();
                self.password.clear();
            }
            ["reports-menu"] => self.screen = Screen::Reports,
            ["category", name] => self.category = name.to_string(),
            ["add", position] => {
                let visible = self.visible_products();
                if let Some(product) = position.parse::<usize>().ok().and_then(|p| visible.get(p)) {
                    self.add_to_cart(*product);
                }
            }
            ["cart", row, action] => {
                let Ok(row) = row.parse::<usize>() else { return };
                if row >= self.cart.len() {
                    return;
                }
                match *action {
                    "add" => self.cart[row].1 += 1,
                    "reduce" => {
                        self.cart[row].1 -= 1;
                        if self.cart[row].1 == 0 {
                            self.cart.remove(row);
                        }
                    }
                    "remove" => {
                        self.cart.remove(row);
                    }
                    _ => {}
                }
            }
            ["checkout"] => self.checkout_open = true,
            ["card"] => self.card_selected = true,
            ["cancel"] => {
                self.checkout_open = false;
                self.reset_form();
            }
            ["complete"] => self.complete_transaction(),
            _ => {}
        }
    }

    fn clear(&mut self, id: &str) {
        if let Some(field) = self.field(id) {
            field.clear();
        }
    }

    fn send_keys(&mut self, id: &str, text: &str) {
        if let Some(field) = self.field(id) {
            field.push_str(text);
        }
    }

    fn clear_storage(&mut self) {
        self.logged_in = false;
        self.cart.clear();
        self.transactions.clear();
        self.checkout_open = false;
        self.reset_form();
        self.search.clear();
        self.category = CATEGORIES[0].to_string();
        self.email.clear();
        self.password.clear();
    }

    fn alert(&self) -> Option<String> {
        self.alert.clone()
    }

    fn close_alert(&mut self) {
        self.alert = None;
    }
}

impl PosApp {
    fn field(&mut self, id: &str) -> Option<&mut String> {
        match id {
            "email" => Some(&mut self.email),
            "password" => Some(&mut self.password),
            "search" => Some(&mut self.search),
            "customer-name" => Some(&mut self.customer_name),
            "customer-email" => Some(&mut self.customer_email),
            "notes" => Some(&mut self.notes),
            _ => None,
        }
    }
}
