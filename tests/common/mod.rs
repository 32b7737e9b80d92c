#![allow(dead_code)]

pub mod fake_browser;
pub mod pos_app;
pub mod utils;
