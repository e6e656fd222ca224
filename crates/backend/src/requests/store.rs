//! Store request and response schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{AccountId, StoreId, ValidationErrors, ZipCode};

use super::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, normalize_optional};
use crate::models::{NewStore, Store};

/// Payload for opening a store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStoreRequest {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub zip_code: String,
}

impl CreateStoreRequest {
    /// Validate into a [`NewStore`] owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self, owner_id: AccountId) -> Result<NewStore, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let slug = self.slug.trim().to_owned();
        if let Err(message) = check_slug(&slug) {
            errors.add("slug", message);
        }

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.add("name", "name cannot be empty");
        } else if name.len() > MAX_NAME_LENGTH {
            errors.add(
                "name",
                format!("name must be at most {MAX_NAME_LENGTH} characters"),
            );
        }

        let description = normalize_optional(self.description);
        if let Some(ref text) = description
            && text.len() > MAX_DESCRIPTION_LENGTH
        {
            errors.add(
                "description",
                format!("description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            );
        }

        let zip_code = ZipCode::parse(self.zip_code.trim())
            .map_err(|e| errors.add("zip_code", e.to_string()))
            .ok();

        let Some(zip_code) = zip_code else {
            return Err(errors);
        };

        errors.into_result(NewStore {
            id: None,
            owner_id,
            slug,
            name,
            description,
            zip_code,
        })
    }
}

/// Payload for editing a store's display fields. The slug is permanent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStoreRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub zip_code: String,
}

/// Validated store edits.
#[derive(Debug, Clone)]
pub struct StoreUpdate {
    pub name: String,
    pub description: Option<String>,
    pub zip_code: ZipCode,
}

impl UpdateStoreRequest {
    /// Validate into a [`StoreUpdate`].
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self) -> Result<StoreUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.add("name", "name cannot be empty");
        } else if name.len() > MAX_NAME_LENGTH {
            errors.add(
                "name",
                format!("name must be at most {MAX_NAME_LENGTH} characters"),
            );
        }

        let description = normalize_optional(self.description);
        if let Some(ref text) = description
            && text.len() > MAX_DESCRIPTION_LENGTH
        {
            errors.add(
                "description",
                format!("description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
            );
        }

        let zip_code = ZipCode::parse(self.zip_code.trim())
            .map_err(|e| errors.add("zip_code", e.to_string()))
            .ok();

        let Some(zip_code) = zip_code else {
            return Err(errors);
        };

        errors.into_result(StoreUpdate {
            name,
            description,
            zip_code,
        })
    }
}

/// Slug rules: 3-40 chars, lowercase ASCII letters, digits, and interior
/// dashes.
fn check_slug(slug: &str) -> Result<(), String> {
    if slug.len() < 3 || slug.len() > 40 {
        return Err("slug must be 3-40 characters".to_owned());
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err("slug cannot start or end with a dash".to_owned());
    }
    if let Some(bad) = slug
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!(
            "slug may only contain lowercase letters, digits, and dashes (found '{bad}')"
        ));
    }
    Ok(())
}

/// Outbound store shape.
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    pub id: StoreId,
    pub owner_id: AccountId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub zip_code: ZipCode,
    pub created_at: DateTime<Utc>,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            owner_id: store.owner_id,
            slug: store.slug,
            name: store.name,
            description: store.description,
            zip_code: store.zip_code,
            created_at: store.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn owner() -> AccountId {
        AccountId::parse("abcdefghjkmn").unwrap()
    }

    #[test]
    fn test_valid_store() {
        let req = CreateStoreRequest {
            slug: "garden-goods".to_owned(),
            name: "Garden Goods".to_owned(),
            description: Some("  Seeds and tools.  ".to_owned()),
            zip_code: "97201".to_owned(),
        };
        let new = req.validate(owner()).unwrap();
        assert_eq!(new.slug, "garden-goods");
        assert_eq!(new.description.as_deref(), Some("Seeds and tools."));
        assert_eq!(new.owner_id, owner());
    }

    #[test]
    fn test_slug_rules() {
        for bad in ["ab", "-leading", "trailing-", "Has-Upper", "spa ce", "dot.com"] {
            let req = CreateStoreRequest {
                slug: bad.to_owned(),
                name: "Store".to_owned(),
                description: None,
                zip_code: "97201".to_owned(),
            };
            let errors = req.validate(owner()).unwrap_err();
            assert_eq!(errors.field("slug").len(), 1, "slug {bad:?} should fail");
        }
    }

    #[test]
    fn test_bad_zip_and_empty_name_reported_together() {
        let req = CreateStoreRequest {
            slug: "ok-slug".to_owned(),
            name: String::new(),
            description: None,
            zip_code: "123".to_owned(),
        };
        let errors = req.validate(owner()).unwrap_err();
        assert!(!errors.field("name").is_empty());
        assert!(!errors.field("zip_code").is_empty());
    }
}
