pub mod app;
pub mod auth;
pub mod cars;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod records;
pub mod reports;
pub mod services;
