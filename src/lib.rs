#![deny(missing_docs)]

//! Core library for the docsum document summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from stored uploads.
pub mod extract;
/// Structured logging and tracing setup.
pub mod logging;
/// Upload processing service tying storage, extraction, and summarization together.
pub mod service;
/// Chunking and map-reduce summarization pipeline.
pub mod summarize;
