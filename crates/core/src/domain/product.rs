use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// A single spec attribute value. Most attributes are plain text; a few
/// (color options) are lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecValue {
    Text(String),
    List(Vec<String>),
}

impl SpecValue {
    pub fn render(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::List(values) => values.join(", "),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub stock: u32,
    pub description: String,
    pub specs: BTreeMap<String, SpecValue>,
}

impl Product {
    pub fn availability_label(&self) -> &'static str {
        if self.stock > 0 {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }

    /// Flatten the spec map into a single line for prompt interpolation.
    pub fn specs_summary(&self) -> String {
        self.specs
            .iter()
            .map(|(key, value)| format!("{key}: {}", value.render()))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
