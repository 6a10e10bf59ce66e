//! # Menon Common Library
//!
//! Shared code for the Menon control services including:
//! - JSON flatten/normalize helpers for JSON-encoded record columns
//! - Record models (products, offers) and their write payloads
//! - Remote record store client (PostgREST dialect) and in-memory store
//! - Outbound webhook notifier
//! - Configuration loading

pub mod config;
pub mod error;
pub mod jsonflat;
pub mod models;
pub mod store;
pub mod webhook;

pub use error::{Error, Result};
pub use jsonflat::{FlatEntry, Leaf};
