//! Shared test fixtures for SeedForge crates.
//!
//! This crate provides deterministic data sets and builders for testing.
//! It depends only on `seedforge-core` so every other crate can use it.
//!
//! - [`stores`] - Store sets with known cluster structure
//! - [`skus`] - SKU catalogs with predictable prices and scores
//! - [`lines`] - Allocation line builders for validator tests
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! seedforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use seedforge_test::stores::sample_stores;
//! use seedforge_test::skus::priced_catalog;
//!
//! assert_eq!(sample_stores().len(), 8);
//! assert_eq!(priced_catalog(20).len(), 20);
//! ```

pub mod lines;
pub mod skus;
pub mod stores;

pub use lines::{line, lines_totaling};
pub use skus::{flat_catalog, priced_catalog};
pub use stores::{identical_stores, sample_features, sample_stores};
