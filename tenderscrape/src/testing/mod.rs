//! Testing utilities for tenderscrape.
//!
//! This module provides:
//! - An in-memory transport with scripted failures
//! - HTML fixtures for results and detail pages

pub mod fixtures;
mod mocks;

pub use mocks::StaticTransport;
