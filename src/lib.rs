pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod fixtures;
pub mod model;
pub mod output;
pub mod session;
pub mod store;
pub mod utils;

#[cfg(test)]
mod tests;
