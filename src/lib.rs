pub mod commands;
pub mod config;
pub mod console;
pub mod cycle;
pub mod engine;
pub mod exceptions;
pub mod jira;
pub mod models;
