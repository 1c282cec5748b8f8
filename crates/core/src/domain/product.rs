use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn generate() -> Self {
        Self(format!("P-{}", Uuid::new_v4().simple()))
    }
}

/// A product listing as managed from the back office. Money is integer
/// cents; `image` is an already-uploaded path or URL, never raw bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    pub colour: String,
    pub size: String,
    pub material: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: i64,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub colour: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub colour: Option<String>,
    pub size: Option<String>,
    pub material: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub image: Option<Option<String>>,
}

impl Product {
    pub fn create(input: NewProduct) -> Result<Self, DomainError> {
        validate_fields(&input.title, input.price_cents, input.stock)?;
        let now = Utc::now();
        Ok(Self {
            id: ProductId::generate(),
            title: input.title,
            brand: input.brand,
            colour: input.colour,
            size: input.size,
            material: input.material,
            description: input.description,
            price_cents: input.price_cents,
            stock: input.stock,
            image: input.image,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_patch(&mut self, patch: ProductPatch) -> Result<(), DomainError> {
        let title = patch.title.as_deref().unwrap_or(&self.title);
        let price_cents = patch.price_cents.unwrap_or(self.price_cents);
        let stock = patch.stock.unwrap_or(self.stock);
        validate_fields(title, price_cents, stock)?;

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(colour) = patch.colour {
            self.colour = colour;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(material) = patch.material {
            self.material = material;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_fields(title: &str, price_cents: i64, stock: i64) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation("product title must not be empty".to_string()));
    }
    if price_cents < 0 {
        return Err(DomainError::InvariantViolation(
            "product price must not be negative".to_string(),
        ));
    }
    if stock < 0 {
        return Err(DomainError::InvariantViolation(
            "product stock must not be negative".to_string(),
        ));
    }
    Ok(())
}
