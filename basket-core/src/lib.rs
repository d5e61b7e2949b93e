//! Basket Core - Gecko-Basket e-commerce backend
//!
//! This crate provides the REST API for the Gecko-Basket storefront:
//! accounts, catalog, cart, wishlist, orders and delivery locations.

pub mod api;
pub mod config;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
