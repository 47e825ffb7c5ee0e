//! Domain models for the API.
//!
//! These types are what repositories hand to handlers. Their serde shape is
//! also the stored document shape, so the wire names (`_id`, `imageurl`,
//! `companyname`) live here.

pub mod product;
pub mod user;

pub use product::{NewProduct, Product};
pub use user::{User, UserProfile};
