use crate::domain::values::product_id::ProductId;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub categories: String,
    pub rating: Option<f64>,
    pub brand: Option<String>,
}

impl Product {
    /// Text representation for embedding: name, description, categories and
    /// brand joined by single spaces. A missing brand contributes an empty
    /// string so the field positions never shift.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name,
            self.description,
            self.categories,
            self.brand.as_deref().unwrap_or("")
        )
    }
}

/// Fields accepted when creating a product. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub categories: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched. The nullable
/// fields take `Some(None)` to clear the stored value, which is how an
/// explicit JSON `null` deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<String>>,
}

/// Present-but-null becomes `Some(None)`; an absent field falls back to the
/// `default` of `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.categories.is_none()
            && self.rating.is_none()
            && self.brand.is_none()
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(categories) = &self.categories {
            product.categories = categories.clone();
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(brand) = &self.brand {
            product.brand = brand.clone();
        }
    }
}

/// One row of a bulk import. An explicit id overwrites any stored product
/// with the same id.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(flatten)]
    pub product: NewProduct,
}
