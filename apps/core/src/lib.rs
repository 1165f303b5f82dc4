//! Dialogix NLP: sentiment, entities, intents and extractive summaries over HTTP.

pub mod brain;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

#[cfg(test)]
mod tests;
