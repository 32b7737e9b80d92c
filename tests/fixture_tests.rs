use pos_ui_suite::error::SuiteError;
use pos_ui_suite::fixture::data::{
    CART_DATA, CHECKOUT_DATA, FixtureRecord, FixtureTable, Fixtures, LOGIN_DATA, REPORTS_DATA,
};

use crate::common::utils::{repo_fixtures, write_file};

mod common;

// ============================================================================
// Shipped fixture tables
// ============================================================================

#[test]
fn login_cases() {
    let fixtures = repo_fixtures();

    let valid = fixtures.login("valid_login").unwrap();
    assert_eq!(valid.expected_result, "success");

    let invalid = fixtures.login("invalid_login").unwrap();
    assert_eq!(invalid.email, "invalid@test.com");
    assert_eq!(invalid.password, "wrongpassword");
    assert_eq!(invalid.expected_result, "failure");
}

#[test]
fn search_cases() {
    let fixtures = repo_fixtures();

    let by_name = fixtures.search("search_wireless_headphones").unwrap();
    assert_eq!(by_name.product_name, "Wireless Headphones");
    assert_eq!(by_name.category, "All Categories");

    let by_category = fixtures.search("search_category_only").unwrap();
    assert_eq!(by_category.product_name, "");
    assert_eq!(by_category.category, "Electronics");

    let combined = fixtures.search("search_all_categories").unwrap();
    assert_eq!(combined.product_name, "Programming Book");
}

#[test]
fn cart_cases_carry_expected_quantity() {
    let fixtures = repo_fixtures();

    assert_eq!(
        fixtures.cart("increase_quantity").unwrap().expected_quantity.as_deref(),
        Some("2")
    );
    assert_eq!(
        fixtures.cart("decrease_quantity").unwrap().expected_quantity.as_deref(),
        Some("1")
    );
    let remove = fixtures.cart("remove_item").unwrap();
    assert_eq!(remove.product_name, "Wireless Headphones");
    assert_eq!(remove.expected_quantity, None);
}

#[test]
fn checkout_and_reports_cases() {
    let fixtures = repo_fixtures();

    let checkout = fixtures.checkout("complete_checkout_card").unwrap();
    assert_eq!(checkout.customer_name, "Jane Doe");
    assert_eq!(checkout.customer_email, "jane@test.com");
    assert_eq!(checkout.payment_method, "Card");

    let reports = fixtures.reports("after_single_transaction").unwrap();
    assert_eq!(reports.expected_total_sales, "$99.99");
    assert_eq!(reports.expected_transactions, "1");
    assert_eq!(reports.expected_average_order, "$99.99");
    assert_eq!(reports.expected_top_products_count, "1");
    assert_eq!(reports.expected_product.as_deref(), Some("Wireless Headphones"));
}

// ============================================================================
// Lookup errors
// ============================================================================

#[test]
fn unknown_case_names_table_and_case() {
    let err = repo_fixtures().cart("nonexistent").unwrap_err();

    assert!(matches!(err, SuiteError::FixtureCaseNotFound { .. }));
    assert_eq!(err.to_string(), "Cart test case not found: nonexistent");
}

#[test]
fn missing_file_is_a_fixture_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Fixtures::new(dir.path()).login("valid_login").unwrap_err();

    match err {
        SuiteError::FixtureFile { path, .. } => assert!(path.ends_with(LOGIN_DATA)),
        other => panic!("Expected FixtureFile, got {:?}", other),
    }
}

#[test]
fn missing_required_column() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        CHECKOUT_DATA,
        "test_case,customer_name,customer_email\nshort,Jane,jane@test.com\n",
    );

    let err = Fixtures::new(dir.path()).checkout("short").unwrap_err();
    assert!(matches!(
        err,
        SuiteError::FixtureField { ref case, ref field } if case == "short" && field == "payment_method"
    ));
}

#[test]
fn optional_columns_may_be_absent() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        CART_DATA,
        "test_case,product_name,expected_result\nadd,Coffee Mug,success\n",
    );
    write_file(
        dir.path(),
        REPORTS_DATA,
        "test_case,expected_total_sales,expected_transactions,expected_average_order,expected_top_products_count,expected_product\nempty,$0.00,0,$0.00,0,  \n",
    );
    let fixtures = Fixtures::new(dir.path());

    assert_eq!(fixtures.cart("add").unwrap().expected_quantity, None);
    assert_eq!(fixtures.reports("empty").unwrap().expected_product, None);
}

#[test]
fn ragged_row_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "broken.csv", "test_case,a,b\nx,1\n");

    let err = FixtureTable::load(&path, "Broken").unwrap_err();
    assert!(matches!(err, SuiteError::FixtureFile { .. }));
}

// ============================================================================
// Raw tables and records
// ============================================================================

#[test]
fn table_keeps_column_order_and_first_match() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "t.csv",
        "test_case,email,password\ndup,first@x.com,1\ndup,second@x.com,2\n",
    );

    let table = FixtureTable::load(&path, "Login").unwrap();
    assert_eq!(table.records.len(), 2);

    let record = table.case("dup").unwrap();
    assert_eq!(record.get("email"), Some("first@x.com"));
    assert_eq!(
        record.columns().collect::<Vec<_>>(),
        vec!["test_case", "email", "password"]
    );
}

#[test]
fn record_field_reports_its_case() {
    let record = FixtureRecord::new(vec![("test_case".into(), "row".into())]);

    assert_eq!(record.case_name(), Some("row"));
    assert_eq!(record.get("missing"), None);
    assert_eq!(
        record.field("missing").unwrap_err().to_string(),
        "Fixture case 'row' has no field 'missing'"
    );
}

#[test]
fn raw_record_lookup_through_fixtures() {
    let fixtures = repo_fixtures();
    let record = fixtures.record(LOGIN_DATA, "Login", "valid_login").unwrap();

    assert_eq!(record.field("expected_result").unwrap(), "success");
    assert!(fixtures.data_dir().ends_with("data"));
}
