//! Domain models persisted by the stores.

pub mod address;
pub mod cart;
pub mod order;
pub mod wishlist;

pub use address::{AddressError, ShippingAddress};
pub use cart::CartItem;
pub use order::Order;
pub use wishlist::{NewWishlistItem, WishlistItem};
