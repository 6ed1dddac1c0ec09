//! Sundrop Client - state & persistence layer for the mobile storefront.
//!
//! The mobile app is a thin client over a commerce backend plus a handful of
//! platform SDKs. Everything that is not rendering lives here:
//!
//! - Explicit stores (session, cart, orders, wishlist, shipping address)
//!   composed once at process start into an [`state::AppState`]
//! - A local key-value [`storage`] layer with JSON values and write-through
//!   durability
//! - HTTP clients for the product catalog, payment-intent creation, and
//!   reverse geocoding
//! - Object-safe traits for the device collaborators the UI drives
//!   (biometric prompt, geolocation, hosted payment sheet)
//!
//! # Architecture
//!
//! Stores mutate in memory and await their durable write before returning,
//! so callers can confirm durability before navigating away. Per-user
//! collections are keyed by account email and survive logout; the in-memory
//! copies are unloaded at logout and reloaded at the next login so one
//! user's data never leaks into another session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod models;
pub mod payment;
pub mod state;
pub mod storage;
pub mod stores;

pub use error::{AppError, Result};
pub use state::AppState;
