//! Test Module
//!
//! Cross-module test suite for the Dialogix NLP service.
//!
//! ## Test Categories
//! - `brain_tests`: Sentiment, entities, intents, summarization and the analyzer
//! - `sanitize_tests`: Result normalization and loose-input coercion
//! - `api_tests`: HTTP routes driven through the router
//! - `property_tests`: Invariants over arbitrary input

pub mod api_tests;
pub mod property_tests;
