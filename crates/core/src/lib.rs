//! Sundrop Core - Shared types library.
//!
//! This crate provides common types used across all Sundrop components:
//! - `client` - Client state & persistence layer for the mobile storefront
//! - `integration-tests` - Cross-store scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, money amounts,
//!   and collaborator outcome enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
