use serde::{Deserialize, Serialize};

/// Price as written in the snapshot. Integers stay integers, so `8` is echoed
/// back as `8` and `8.0` as `8.0`.
pub type Price = serde_json::Number;

/// One product record from the catalog snapshot.
///
/// `id`, `name` and `price` are mandatory; everything else defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    pub name: String,
    /// Currency-agnostic price.
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Path or file name of the stored product image. Used for rendering only.
    #[serde(default, rename = "image")]
    pub image_ref: String,
    /// Precomputed image embedding. Entries without one are never ranked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl CatalogEntry {
    /// Embedding slice, if the entry carries one.
    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    /// File name component of [`image_ref`](Self::image_ref).
    pub fn image_file_name(&self) -> &str {
        self.image_ref
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.image_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default_to_empty() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id":"p1","name":"Mug","price":4.5}"#).unwrap();
        assert_eq!(entry.category, "");
        assert_eq!(entry.description, "");
        assert_eq!(entry.image_ref, "");
        assert!(entry.embedding().is_none());
    }

    #[test]
    fn image_field_maps_to_image_ref() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{"id":"p1","name":"Mug","price":4,"image":"product_1.jpg","embedding":[0.5,0.5]}"#,
        )
        .unwrap();
        assert_eq!(entry.image_ref, "product_1.jpg");
        assert_eq!(entry.embedding(), Some(&[0.5f32, 0.5][..]));
    }

    #[test]
    fn missing_price_is_rejected() {
        let res = serde_json::from_str::<CatalogEntry>(r#"{"id":"p1","name":"Mug"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn image_file_name_strips_directories() {
        let entry = CatalogEntry {
            id: "p1".into(),
            name: "Mug".into(),
            price: Price::from(1),
            category: String::new(),
            description: String::new(),
            image_ref: "assets/product/product_7.jpg".into(),
            embedding: None,
        };
        assert_eq!(entry.image_file_name(), "product_7.jpg");
    }

    #[test]
    fn embedding_is_not_serialized_when_absent() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id":"p1","name":"Mug","price":4.5}"#).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("embedding").is_none());
        assert_eq!(json["image"], "");
    }

    #[test]
    fn price_keeps_its_written_form() {
        let int: CatalogEntry =
            serde_json::from_str(r#"{"id":"p1","name":"Mug","price":8}"#).unwrap();
        let whole: CatalogEntry =
            serde_json::from_str(r#"{"id":"p2","name":"Mug","price":8.0}"#).unwrap();
        let frac: CatalogEntry =
            serde_json::from_str(r#"{"id":"p3","name":"Mug","price":19.99}"#).unwrap();

        assert_eq!(int.price.to_string(), "8");
        assert_eq!(whole.price.to_string(), "8.0");
        assert_eq!(frac.price.to_string(), "19.99");
        assert_eq!(serde_json::to_string(&int.price).unwrap(), "8");
    }
}
