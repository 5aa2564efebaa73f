//! Integration tests for Tinytrip

mod crawl_tests;
