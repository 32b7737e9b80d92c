use crate::pages::checkout::SUCCESS_PHRASE;
use crate::pages::reports::EXPECTED_HEADING;
use crate::scenario::context::ScenarioContext;
use crate::scenario::scenario_model::{Priority, StepResult};

/// Product every cart, checkout and report scenario works with.
pub const DEFAULT_PRODUCT: &str = "Wireless Headphones";

/// Term searched and then cleared by the clear-search scenario.
const CLEAR_SEARCH_TERM: &str = "Programming";

pub type ScenarioFn = fn(&mut ScenarioContext<'_>) -> StepResult;

/// One end-to-end test of the POS application.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub id: &'static str,
    /// Stable identifier, also used for screenshot file names.
    pub name: &'static str,
    pub title: &'static str,
    pub priority: Priority,
    pub body: ScenarioFn,
}

impl Scenario {
    /// Case-insensitive substring match against id or name.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.to_lowercase();
        self.id.to_lowercase().contains(&filter) || self.name.to_lowercase().contains(&filter)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Scenarios whose id or name contains `filter`; all of them without one.
pub fn select(scenarios: Vec<Scenario>, filter: Option<&str>) -> Vec<Scenario> {
    match filter {
        Some(f) => scenarios.into_iter().filter(|s| s.matches(f)).collect(),
        None => scenarios,
    }
}

/// The full suite, in execution order.
pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "TC_001",
            name: "test_valid_login",
            title: "Login with valid credentials",
            priority: Priority::High,
            body: valid_login,
        },
        Scenario {
            id: "TC_002",
            name: "test_invalid_login_credentials",
            title: "Login with invalid credentials shows an error",
            priority: Priority::Medium,
            body: invalid_login,
        },
        Scenario {
            id: "TC_003",
            name: "test_logout_functionality",
            title: "Logout from application",
            priority: Priority::High,
            body: logout,
        },
        Scenario {
            id: "TC_004",
            name: "test_view_product_catalog",
            title: "View product catalog",
            priority: Priority::High,
            body: view_product_catalog,
        },
        Scenario {
            id: "TC_005",
            name: "test_search_products_by_name",
            title: "Search products by name",
            priority: Priority::High,
            body: search_products_by_name,
        },
        Scenario {
            id: "TC_006",
            name: "test_filter_products_by_category",
            title: "Filter products by category",
            priority: Priority::High,
            body: filter_products_by_category,
        },
        Scenario {
            id: "TC_007",
            name: "test_add_product_to_cart",
            title: "Add product to cart from catalog",
            priority: Priority::High,
            body: add_product_to_cart,
        },
        Scenario {
            id: "TC_008",
            name: "test_search_and_category_combination",
            title: "Combined search and category filtering",
            priority: Priority::Medium,
            body: search_and_category_combination,
        },
        Scenario {
            id: "TC_009",
            name: "test_add_multiple_products_to_cart",
            title: "Add multiple different products to cart",
            priority: Priority::Medium,
            body: add_multiple_products_to_cart,
        },
        Scenario {
            id: "TC_010",
            name: "test_clear_search_functionality",
            title: "Clear search to show all products",
            priority: Priority::Medium,
            body: clear_search,
        },
        Scenario {
            id: "TC_011",
            name: "test_add_wireless_headphones_to_cart",
            title: "Add Wireless Headphones to cart",
            priority: Priority::High,
            body: add_wireless_headphones,
        },
        Scenario {
            id: "TC_012",
            name: "test_increase_cart_item_quantity",
            title: "Increase cart item quantity",
            priority: Priority::High,
            body: increase_cart_item_quantity,
        },
        Scenario {
            id: "TC_013",
            name: "test_decrease_cart_item_quantity",
            title: "Decrease cart item quantity",
            priority: Priority::High,
            body: decrease_cart_item_quantity,
        },
        Scenario {
            id: "TC_014",
            name: "test_remove_item_from_cart",
            title: "Remove item from cart",
            priority: Priority::High,
            body: remove_item_from_cart,
        },
        Scenario {
            id: "TC_015",
            name: "test_complete_checkout_using_helper_method",
            title: "Complete checkout with card payment",
            priority: Priority::High,
            body: complete_checkout,
        },
        Scenario {
            id: "TC_016",
            name: "test_complete_transaction_and_verify_using_helper_method",
            title: "Complete transaction and verify sales reports",
            priority: Priority::High,
            body: transaction_then_reports,
        },
        Scenario {
            id: "TC_017",
            name: "test_navigate_to_reports_page",
            title: "Navigate to reports page",
            priority: Priority::Medium,
            body: navigate_to_reports,
        },
    ]
}

// ============================================================================
// Login
// ============================================================================

fn valid_login(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(true)
}

fn invalid_login(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().login("invalid_login")?;
    let login = ctx.login_page();

    login.login(&case.email, &case.password)?;
    ctx.settle();

    if case.expected_result != "failure" {
        return Ok(());
    }

    let on_login = login.is_on_login_page()?;
    let url = login.current_url()?;
    ctx.ensure_with_actual(
        on_login,
        Some(url.clone()),
        format!(
            "Should still be on login page after invalid login (email: {}) but was redirected to: {}",
            case.email, url
        ),
    )?;

    let error = login.error_message()?;
    ctx.ensure(
        error.is_some(),
        format!("Error message should be displayed for invalid credentials (email: {})", case.email),
    )?;
    let text = error.unwrap_or_default();
    ctx.ensure_with_actual(
        text.contains("Invalid credentials"),
        Some(text.clone()),
        format!("Error message should contain 'Invalid credentials'. Got: {}", text),
    )
}

fn logout(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(false)?;
    ctx.dashboard().logout()?;

    let login = ctx.login_page();
    let on_login = login.is_on_login_page()?;
    let url = login.current_url()?;
    ctx.ensure_with_actual(
        on_login,
        Some(url.clone()),
        format!("Should be redirected to login page after logout but current URL is: {}", url),
    )
}

// ============================================================================
// Product search
// ============================================================================

fn view_product_catalog(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(true)?;

    let count = ctx.dashboard().product_items()?.len();
    ctx.ensure_with_actual(
        count > 0,
        Some(count.to_string()),
        format!("Product catalog should contain products but found {} products", count),
    )
}

fn search_products_by_name(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().search("search_wireless_headphones")?;
    ctx.sign_in(true)?;
    let dashboard = ctx.dashboard();

    let initial = dashboard.product_items()?.len();
    ctx.ensure_with_actual(
        initial > 0,
        Some(initial.to_string()),
        format!("Should have products before search but found {} products", initial),
    )?;

    let searched = dashboard.search_product(&case.product_name)?;
    ctx.settle();

    if case.expected_result == "success" {
        let found = dashboard.product_items()?.len();
        ctx.ensure_with_actual(
            searched,
            Some(found.to_string()),
            format!("Search for '{}' should be performed on the product search box", case.product_name),
        )?;
    }
    Ok(())
}

fn filter_products_by_category(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().search("search_category_only")?;
    ctx.sign_in(true)?;
    let dashboard = ctx.dashboard();

    let initial = dashboard.product_items()?.len();
    ctx.ensure_with_actual(
        initial > 0,
        Some(initial.to_string()),
        "Should have products before filtering",
    )?;

    let selected = dashboard.select_category(&case.category)?;
    ctx.settle();

    if case.expected_result == "success" {
        let filtered = dashboard.product_items()?.len();
        ctx.ensure_with_actual(
            selected,
            Some(filtered.to_string()),
            format!("Should show products when '{}' category is selected", case.category),
        )?;
    }
    Ok(())
}

fn add_product_to_cart(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(true)?;
    let dashboard = ctx.dashboard();

    let count = dashboard.product_items()?.len();
    ctx.ensure_with_actual(
        count > 0,
        Some(count.to_string()),
        format!("Products should be available in catalog but found {} products", count),
    )?;

    let added = dashboard.add_first_product_to_cart()?;
    ctx.ensure(added, "Should be able to add first product to cart")?;
    ctx.settle();
    Ok(())
}

fn search_and_category_combination(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().search("search_all_categories")?;
    ctx.sign_in(true)?;
    let dashboard = ctx.dashboard();

    let selected = dashboard.select_category(&case.category)?;
    ctx.settle();
    let searched = dashboard.search_product(&case.product_name)?;
    ctx.settle();

    if case.expected_result == "success" {
        let filtered = dashboard.product_items()?.len();
        ctx.ensure_with_actual(
            selected && searched,
            Some(filtered.to_string()),
            format!(
                "Combined search '{}' and category '{}' should work",
                case.product_name, case.category
            ),
        )?;
    }
    Ok(())
}

fn add_multiple_products_to_cart(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(true)?;
    let dashboard = ctx.dashboard();

    for (index, ordinal) in ["first", "second", "third"].into_iter().enumerate() {
        let added = dashboard.add_product_to_cart_by_index(index)?;
        ctx.ensure(added, format!("Should be able to add {} product", ordinal))?;
        ctx.settle();
    }
    Ok(())
}

fn clear_search(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(true)?;
    let dashboard = ctx.dashboard();

    dashboard.search_product(CLEAR_SEARCH_TERM)?;
    ctx.settle();
    dashboard.search_product("")?;
    ctx.settle();

    let shown = dashboard.product_items()?.len();
    ctx.ensure_with_actual(
        shown > 0,
        Some(shown.to_string()),
        "Should show products after clearing search",
    )
}

// ============================================================================
// Cart management
// ============================================================================

fn add_wireless_headphones(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().cart("add_wireless_headphones")?;
    ctx.sign_in(true)?;
    ctx.add_searched_product(&case.product_name)?;
    expect_quantity(ctx, case.expected_quantity.as_deref())
}

fn increase_cart_item_quantity(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().cart("increase_quantity")?;
    ctx.sign_in(true)?;
    ctx.add_searched_product(&case.product_name)?;

    let increased = ctx.dashboard().increase_cart_item_quantity(0)?;
    ctx.ensure(
        increased,
        format!("Should be able to increase cart item quantity for {}", case.product_name),
    )?;
    ctx.settle();
    expect_quantity(ctx, case.expected_quantity.as_deref())
}

fn decrease_cart_item_quantity(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().cart("decrease_quantity")?;
    ctx.sign_in(true)?;
    ctx.add_searched_product(&case.product_name)?;

    // Bring the row to quantity 2 first
    ctx.dashboard().increase_cart_item_quantity(0)?;
    ctx.settle();

    let reduced = ctx.dashboard().reduce_cart_item_quantity(0)?;
    ctx.ensure(
        reduced,
        format!("Should be able to decrease cart item quantity for {}", case.product_name),
    )?;
    ctx.settle();
    expect_quantity(ctx, case.expected_quantity.as_deref())
}

fn remove_item_from_cart(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().cart("remove_item")?;
    ctx.sign_in(true)?;
    ctx.add_searched_product(&case.product_name)?;

    let removed = ctx.dashboard().remove_cart_item(0)?;
    ctx.ensure(
        removed,
        format!("Should be able to remove {} from cart", case.product_name),
    )?;
    ctx.settle();
    Ok(())
}

fn expect_quantity(ctx: &mut ScenarioContext<'_>, expected: Option<&str>) -> StepResult {
    let Some(expected) = expected else {
        return Ok(());
    };
    let shown = ctx.dashboard().cart_item_quantity_text(0)?;
    ctx.ensure_with_actual(
        shown.as_deref().map(str::trim) == Some(expected),
        shown.clone(),
        format!("First cart row should show quantity {} but shows {:?}", expected, shown),
    )
}

// ============================================================================
// Checkout and reports
// ============================================================================

fn complete_checkout(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let case = ctx.fixtures().checkout("complete_checkout_card")?;
    ctx.sign_in(true)?;
    ctx.add_searched_product(DEFAULT_PRODUCT)?;

    let opened = ctx.cart().proceed_to_checkout()?;
    ctx.ensure(opened, "Should be able to open checkout modal")?;
    ctx.settle();

    let (success, message) = ctx
        .checkout()
        .complete_checkout_transaction(&case.customer_name, &case.customer_email, &case.notes)?
        .into_pair();
    ctx.ensure_with_actual(
        success,
        Some(message.clone()),
        format!("Checkout should complete successfully but failed. Error message: {}", message),
    )?;
    ctx.ensure_with_actual(
        message.contains(SUCCESS_PHRASE),
        Some(message.clone()),
        format!("Should get '{}' message but got: {}", SUCCESS_PHRASE, message),
    )
}

fn transaction_then_reports(ctx: &mut ScenarioContext<'_>) -> StepResult {
    let expected = ctx.fixtures().reports("after_single_transaction")?;
    let checkout = ctx.fixtures().checkout("complete_checkout_card")?;
    ctx.sign_in(true)?;

    let dashboard = ctx.dashboard();
    dashboard.search_product(DEFAULT_PRODUCT)?;
    ctx.settle();
    dashboard.add_first_product_to_cart()?;
    ctx.settle();

    ctx.cart().proceed_to_checkout()?;
    ctx.settle();
    let (success, message) = ctx
        .checkout()
        .complete_checkout_transaction(
            &checkout.customer_name,
            &checkout.customer_email,
            &checkout.notes,
        )?
        .into_pair();
    ctx.ensure_with_actual(
        success,
        Some(message.clone()),
        format!("Transaction should complete successfully before verifying reports but failed: {}", message),
    )?;
    ctx.settle();

    dashboard.click_reports_menu()?;
    ctx.settle();

    let verification = ctx.reports().verify_reports_data(
        &expected.expected_total_sales,
        &expected.expected_transactions,
        &expected.expected_average_order,
        &expected.expected_top_products_count,
        expected.expected_product.as_deref(),
    )?;
    let actual = verification.actual_values.clone();

    ctx.ensure(verification.page_loaded, "Reports page should be loaded")?;
    ctx.ensure(
        verification.correct_heading,
        format!("Should have correct '{}' heading", EXPECTED_HEADING),
    )?;
    ctx.ensure_with_actual(
        verification.total_sales_match,
        actual.total_sales.clone(),
        format!(
            "Total sales should match expected value. Expected: {}, Got: {:?}",
            expected.expected_total_sales, actual.total_sales
        ),
    )?;
    ctx.ensure_with_actual(
        verification.transactions_match,
        actual.transactions.clone(),
        format!(
            "Transactions count should match expected value. Expected: {}, Got: {:?}",
            expected.expected_transactions, actual.transactions
        ),
    )?;
    ctx.ensure_with_actual(
        verification.average_order_match,
        actual.average_order.clone(),
        format!(
            "Average order should match expected value. Expected: {}, Got: {:?}",
            expected.expected_average_order, actual.average_order
        ),
    )?;
    ctx.ensure_with_actual(
        verification.top_products_count_match,
        actual.top_products_count.clone(),
        format!(
            "Top products count should match expected value. Expected: {}, Got: {:?}",
            expected.expected_top_products_count, actual.top_products_count
        ),
    )?;
    if let Some(in_list) = verification.product_in_list {
        ctx.ensure(
            in_list,
            format!(
                "Product '{}' should be present in Top Products list",
                expected.expected_product.as_deref().unwrap_or_default()
            ),
        )?;
    }
    Ok(())
}

fn navigate_to_reports(ctx: &mut ScenarioContext<'_>) -> StepResult {
    ctx.sign_in(true)?;
    ctx.dashboard().click_reports_menu()?;
    ctx.settle();

    let reports = ctx.reports();
    let on_reports = reports.is_on_reports_page()?;
    ctx.ensure(on_reports, "Should be on Reports page after navigation")?;

    let heading = reports.heading_text()?;
    ctx.ensure_with_actual(
        heading.as_deref() == Some(EXPECTED_HEADING),
        heading.clone(),
        format!("Should see '{}' heading but got: {:?}", EXPECTED_HEADING, heading),
    )?;

    let metrics = reports.all_metrics()?;
    for (label, value) in [
        ("Total sales", &metrics.total_sales),
        ("Transactions", &metrics.transactions),
        ("Average order", &metrics.average_order),
        ("Top products count", &metrics.top_products_count),
    ] {
        ctx.ensure_with_actual(
            value.is_some(),
            value.clone(),
            format!("{} element should be present on reports page", label),
        )?;
    }
    Ok(())
}
