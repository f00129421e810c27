pub mod analytics;
pub mod catalog;
pub mod config;
pub mod contacts;
pub mod error;
pub mod telemetry;
pub mod workflows;
