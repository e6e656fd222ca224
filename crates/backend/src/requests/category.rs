//! Category request and response schemas.

use serde::{Deserialize, Serialize};

use bazaar_core::{CategoryId, ValidationErrors};

use super::MAX_NAME_LENGTH;
use crate::models::{Category, NewCategory};

/// Payload for creating a category or subcategory.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Parent category ID for a subcategory; absent for top-level.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl CreateCategoryRequest {
    /// Validate into a [`NewCategory`].
    ///
    /// Whether the parent exists (and is itself top-level) is checked
    /// against the database by the service, not here.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self) -> Result<NewCategory, ValidationErrors> {
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

        let parent_id = match self.parent_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => CategoryId::parse(raw)
                .map(Some)
                .map_err(|e| errors.add("parent_id", e.to_string()))
                .ok()
                .flatten(),
            _ => None,
        };

        errors.into_result(NewCategory {
            id: None,
            parent_id,
            name,
        })
    }
}

/// Outbound category shape.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level() {
        let req = CreateCategoryRequest {
            name: " Electronics ".to_owned(),
            parent_id: None,
        };
        let new = req.validate().unwrap();
        assert_eq!(new.name, "Electronics");
        assert!(new.parent_id.is_none());
    }

    #[test]
    fn test_subcategory_parses_parent() {
        let req = CreateCategoryRequest {
            name: "Keyboards".to_owned(),
            parent_id: Some("abcdefghjkmn".to_owned()),
        };
        let new = req.validate().unwrap();
        assert_eq!(new.parent_id.unwrap().as_str(), "abcdefghjkmn");
    }

    #[test]
    fn test_malformed_parent_rejected() {
        let req = CreateCategoryRequest {
            name: "Keyboards".to_owned(),
            parent_id: Some("nope".to_owned()),
        };
        let errors = req.validate().unwrap_err();
        assert!(!errors.field("parent_id").is_empty());
    }
}
