use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// A stored catalog entry. `id` is assigned by the store and never changes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: i64,
}

/// Candidate record for creation. Every field is optional so a payload with
/// missing keys still deserializes and is rejected by `validate` instead.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// A candidate that passed field validation but has no id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDraft {
    title: String,
    description: String,
    price: f64,
    thumbnail: String,
    code: String,
    stock: i64,
}

fn text(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| ServiceError::missing_field(field))
}

impl NewProduct {
    /// Every field must be present and non-empty / non-zero. Fields are checked
    /// in declaration order and the first failing one is reported.
    pub fn validate(self) -> Result<ProductDraft, ServiceError> {
        let title = text(self.title, "title")?;
        let description = text(self.description, "description")?;
        let price = self
            .price
            .filter(|p| *p != 0.0 && !p.is_nan())
            .ok_or_else(|| ServiceError::missing_field("price"))?;
        let thumbnail = text(self.thumbnail, "thumbnail")?;
        let code = text(self.code, "code")?;
        let stock = self.stock.filter(|s| *s != 0).ok_or_else(|| ServiceError::missing_field("stock"))?;
        Ok(ProductDraft { title, description, price, thumbnail, code, stock })
    }
}

impl ProductDraft {
    pub fn code(&self) -> &str { &self.code }

    pub fn with_id(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
            code: self.code,
            stock: self.stock,
        }
    }
}

/// Partial update: only the keys that are `Some` overwrite the stored record.
/// No value is re-validated when merged.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self == &ProductPatch::default()
    }

    pub fn apply_to(self, product: &mut Product) {
        if let Some(v) = self.title { product.title = v; }
        if let Some(v) = self.description { product.description = v; }
        if let Some(v) = self.price { product.price = v; }
        if let Some(v) = self.thumbnail { product.thumbnail = v; }
        if let Some(v) = self.code { product.code = v; }
        if let Some(v) = self.stock { product.stock = v; }
    }
}
