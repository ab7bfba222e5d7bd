//! Integration test modules

mod cli;
mod config;
mod history;
mod scenarios;
