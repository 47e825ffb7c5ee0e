//! Product domain types.

use serde::{Deserialize, Serialize};

use repurpose_core::ProductId;

/// A stored product.
///
/// `price` is free text (e.g. `"₹450"`, `"12.99"`); nothing parses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub quantity: i64,
    #[serde(rename = "imageurl")]
    pub image_url: String,
    #[serde(rename = "companyname")]
    pub company_name: String,
}

/// Product creation payload.
///
/// Unknown fields, including any client-supplied `_id`, are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: String,
    pub quantity: i64,
    #[serde(rename = "imageurl")]
    pub image_url: String,
    #[serde(rename = "companyname")]
    pub company_name: String,
}

impl NewProduct {
    /// Attach the id the store assigned.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            image_url: self.image_url,
            company_name: self.company_name,
        }
    }
}
