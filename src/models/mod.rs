//! # Data Models
//!
//! Records returned by the storefront API. Unknown fields (HATEOAS
//! `_links` and the like) are ignored on decode.

pub mod category;
pub mod order;
pub mod product;
pub mod review;

pub use category::Category;
pub use order::{Order, OrderLine, OrderStatus};
pub use product::Product;
pub use review::Review;
