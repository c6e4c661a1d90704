pub mod analytics;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod telemetry;
