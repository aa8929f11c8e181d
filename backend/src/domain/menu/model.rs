//! Catalogue entities and the payloads used to create or change them.
//!
//! Field names follow the stored document shape (`camelCase`, identifier under
//! `_id`) so entities round-trip through the collection store unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Document, DocumentId, Error};

const fn default_true() -> bool {
    true
}

/// A sellable dish owned by a partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Price in rupees.
    pub price: f64,
    /// Category the item is filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<DocumentId>,
    /// Menu container holding the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<DocumentId>,
    /// User id of the owning partner.
    pub business_partner: DocumentId,
    /// Primary image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<String>,
    /// Whether the item can currently be ordered.
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Vegetarian marker.
    #[serde(default)]
    pub is_vegetarian: bool,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A named grouping of items owned by a partner (the "restaurant").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Partner id owning the menu.
    pub restaurant: DocumentId,
    /// Whether the menu is shown to customers.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A category used to file menu items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// User id of the partner that created the category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_partner: Option<DocumentId>,
    /// Whether the category is in use.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Summary embedded into item details in place of the category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }
}

/// Menu item with its category resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItemDetails {
    /// Item fields; the raw category id is cleared once it resolves.
    #[serde(flatten)]
    pub item: MenuItem,
    /// Resolved category, absent when the reference dangles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

/// Menu together with its items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuWithItems {
    /// Menu fields.
    #[serde(flatten)]
    pub menu: Menu,
    /// Items filed under the menu.
    pub items: Vec<MenuItem>,
}

/// Review state of a partner account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    /// Awaiting review.
    Pending,
    /// Live on the marketplace.
    Approved,
    /// Application declined.
    Rejected,
    /// Temporarily removed from the marketplace.
    Suspended,
}

/// Kitchen vendor profile linked to a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Partner document identifier.
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Owning user account.
    pub user: DocumentId,
    /// Trading name.
    pub business_name: String,
    /// Review state.
    pub status: PartnerStatus,
}

/// Payload for creating a menu item; the owner is supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDraft {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Price in rupees.
    pub price: f64,
    /// Category reference.
    #[serde(default)]
    pub category: Option<DocumentId>,
    /// Menu container reference.
    #[serde(default)]
    pub menu: Option<DocumentId>,
    /// Primary image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<String>,
    /// Availability, defaulting to available.
    #[serde(default)]
    pub is_available: Option<bool>,
    /// Vegetarian marker.
    #[serde(default)]
    pub is_vegetarian: bool,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MenuItemDraft {
    /// Check field constraints before the draft is stored.
    pub fn validate(&self) -> Result<(), Error> {
        require_name(&self.name)?;
        require_price(self.price)
    }

    /// Primary image to store: the explicit `imageUrl`, else the first
    /// gallery image.
    pub fn primary_image(&self) -> Option<String> {
        self.image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.images.first().map(String::as_str))
            .map(str::to_owned)
    }
}

/// Partial update for a menu item; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// New category reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<DocumentId>,
    /// New menu reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<DocumentId>,
    /// New primary image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Replacement gallery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// New availability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
    /// New vegetarian marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_vegetarian: Option<bool>,
    /// Replacement labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl MenuItemPatch {
    /// Check the fields that are present.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(name) = &self.name {
            require_name(name)?;
        }
        self.price.map_or(Ok(()), require_price)
    }
}

/// Payload for creating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Whether the category is in use, defaulting to active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl CategoryDraft {
    /// Check field constraints before the draft is stored.
    pub fn validate(&self) -> Result<(), Error> {
        require_name(&self.name)
    }
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New active flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    /// Check the fields that are present.
    pub fn validate(&self) -> Result<(), Error> {
        self.name.as_deref().map_or(Ok(()), require_name)
    }
}

/// Payload for creating a menu container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDraft {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Whether the menu is shown, defaulting to active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl MenuDraft {
    /// Check field constraints before the draft is stored.
    pub fn validate(&self) -> Result<(), Error> {
        require_name(&self.name)
    }
}

/// Partial update for a menu container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New active flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl MenuPatch {
    /// Check the fields that are present.
    pub fn validate(&self) -> Result<(), Error> {
        self.name.as_deref().map_or(Ok(()), require_name)
    }
}

/// Flatten a patch into the top-level fields it sets.
///
/// Returns `None` when the patch sets nothing, which callers reject as an
/// empty update.
pub fn patch_fields<P: Serialize>(patch: &P) -> Result<Option<Document>, Error> {
    match serde_json::to_value(patch) {
        Ok(Value::Object(fields)) if fields.is_empty() => Ok(None),
        Ok(Value::Object(fields)) => Ok(Some(fields)),
        Ok(_) => Err(Error::internal("patch did not serialise to an object")),
        Err(err) => Err(Error::internal(format!("failed to serialise patch: {err}"))),
    }
}

fn require_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::invalid_request("name must not be empty")
            .with_details(serde_json::json!({ "field": "name" })));
    }
    Ok(())
}

fn require_price(price: f64) -> Result<(), Error> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::invalid_request("price must be a non-negative number")
            .with_details(serde_json::json!({ "field": "price" })));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode;

    fn draft(image_url: Option<&str>, images: &[&str]) -> MenuItemDraft {
        MenuItemDraft {
            name: "Paneer Tikka".to_owned(),
            description: String::new(),
            price: 180.0,
            category: None,
            menu: None,
            image_url: image_url.map(str::to_owned),
            images: images.iter().map(|s| (*s).to_owned()).collect(),
            is_available: None,
            is_vegetarian: true,
            tags: Vec::new(),
        }
    }

    #[rstest]
    #[case(None, &["a.jpg", "b.jpg"], Some("a.jpg"))]
    #[case(Some(""), &["a.jpg"], Some("a.jpg"))]
    #[case(Some("cover.jpg"), &["a.jpg"], Some("cover.jpg"))]
    #[case(None, &[], None)]
    fn primary_image_falls_back_to_gallery(
        #[case] image_url: Option<&str>,
        #[case] images: &[&str],
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(draft(image_url, images).primary_image().as_deref(), expected);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn drafts_reject_bad_prices(#[case] price: f64) {
        let mut bad = draft(None, &[]);
        bad.price = price;
        let err = bad.validate().expect_err("price rejected");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn empty_patch_has_no_fields() {
        let fields = patch_fields(&MenuItemPatch::default()).expect("serialises");
        assert!(fields.is_none());
    }

    #[test]
    fn patch_fields_use_stored_names() {
        let patch = MenuItemPatch {
            is_available: Some(false),
            price: Some(99.0),
            ..MenuItemPatch::default()
        };
        let fields = patch_fields(&patch).expect("serialises").expect("non-empty");
        assert_eq!(fields.get("isAvailable"), Some(&json!(false)));
        assert_eq!(fields.get("price"), Some(&json!(99.0)));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn stored_items_default_to_available() {
        let item: MenuItem = serde_json::from_value(json!({
            "_id": {"$oid": "i1"},
            "name": "Dal",
            "price": 120,
            "businessPartner": "u1",
        }))
        .expect("item decodes");
        assert!(item.is_available);
        assert_eq!(item.business_partner.as_str(), "u1");
    }

    #[test]
    fn details_replace_category_id_with_summary() {
        let item: MenuItem = serde_json::from_value(json!({
            "_id": "i1", "name": "Dal", "price": 120, "businessPartner": "u1",
        }))
        .expect("item decodes");
        let details = MenuItemDetails {
            item,
            category: Some(CategorySummary {
                id: DocumentId::new("c1").expect("id"),
                name: "Curries".to_owned(),
                description: String::new(),
            }),
        };
        let value = serde_json::to_value(details).expect("serialises");
        assert_eq!(value["category"]["name"], json!("Curries"));
        assert_eq!(value["_id"], json!("i1"));
    }
}
