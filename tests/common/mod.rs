#![allow(dead_code)]

pub mod fake_catalog;
pub mod test_app;

pub use fake_catalog::FakeCatalog;
pub use test_app::{TestApp, TestAppOptions};
