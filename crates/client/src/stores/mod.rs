//! Client-side state stores.
//!
//! Each store owns one slice of app state behind `tokio::sync` primitives,
//! mutates in memory, and (where the slice is persisted) awaits the durable
//! write before returning. Per-user stores hold only the logged-in user's
//! copy; [`state::AppState`](crate::state::AppState) loads them at login and
//! unloads them at logout.

pub mod address;
pub mod cart;
pub mod orders;
pub mod session;
pub mod wishlist;

pub use address::AddressStore;
pub use cart::{CartSnapshot, CartStore};
pub use orders::OrderLog;
pub use session::SessionStore;
pub use wishlist::{WishlistError, WishlistStore};
