//! Integration tests for Page-Lens

mod analyze_tests;
mod server_tests;
