//! CSV fixture tables keyed by their `test_case` column.

pub mod data;
