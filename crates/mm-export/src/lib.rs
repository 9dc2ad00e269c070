pub mod cli;
pub mod config;
pub mod endpoints;
pub mod export;
pub mod models;
