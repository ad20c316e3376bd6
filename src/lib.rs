pub mod app;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod index;
pub mod memory;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod search;
