//! Represents a food item in the catalog, in its three shapes: what the client
//! submits, what gets persisted, and what the API hands back.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fields submitted by the client alongside the image upload.
///
/// Arrives as JSON text inside the `food` multipart part.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct FoodRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: String,

    pub price: f64,
}

impl FoodRequest {
    /// Check the submitted fields before anything is written anywhere.
    ///
    /// Returns a human-readable reason on rejection.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!(
                "price must be a non-negative number, got {}",
                self.price
            ));
        }
        Ok(())
    }
}

/// A catalog record as stored in the `foods` table.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct FoodEntity {
    /// Assigned by the repository on first save, stable afterwards.
    pub id: Option<String>,

    pub name: String,

    pub description: String,

    pub category: String,

    pub price: f64,

    /// Public URL of the uploaded image.
    pub image_url: String,
}

impl FoodEntity {
    /// Build an unsaved entity from submitted fields and a resolved image URL.
    pub fn from_request(request: FoodRequest, image_url: String) -> Self {
        Self {
            id: None,
            name: request.name,
            description: request.description,
            category: request.category,
            price: request.price,
            image_url,
        }
    }
}

/// Public view of a catalog record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodResponse {
    pub id: String,
    pub image_url: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
}

impl From<FoodEntity> for FoodResponse {
    fn from(entity: FoodEntity) -> Self {
        Self {
            id: entity.id.unwrap_or_default(),
            image_url: entity.image_url,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            category: entity.category,
        }
    }
}
