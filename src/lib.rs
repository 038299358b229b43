pub mod aggregate;
pub mod app;
pub mod charts;
pub mod dataset;
pub mod models;
pub mod report;
