//! Account request and response schemas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{AccountId, AccountRole, Email, Phone, ValidationErrors};

use super::{MAX_NAME_LENGTH, normalize_optional};
use crate::models::{Account, NewAccount};

/// Payload for registering an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// `customer` (default), `seller`, or `admin`.
    #[serde(default)]
    pub role: Option<String>,
}

impl CreateAccountRequest {
    /// Validate into a [`NewAccount`], collecting every field problem.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self) -> Result<NewAccount, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = Email::parse(self.email.trim())
            .map_err(|e| errors.add("email", e.to_string()))
            .ok();

        let display_name = self.display_name.trim().to_owned();
        if display_name.is_empty() {
            errors.add("display_name", "display name cannot be empty");
        } else if display_name.len() > MAX_NAME_LENGTH {
            errors.add(
                "display_name",
                format!("display name must be at most {MAX_NAME_LENGTH} characters"),
            );
        }

        let phone = match normalize_optional(self.phone) {
            Some(raw) => Phone::parse(&raw)
                .map_err(|e| errors.add("phone", e.to_string()))
                .ok(),
            None => None,
        };

        let role = match self.role.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<AccountRole>()
                .map_err(|e| errors.add("role", e))
                .ok(),
            _ => Some(AccountRole::default()),
        };

        let (Some(email), Some(role)) = (email, role) else {
            return Err(errors);
        };

        errors.into_result(NewAccount {
            id: None,
            email,
            display_name,
            phone,
            role,
        })
    }
}

/// Payload for updating an account's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAccountRequest {
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl UpdateAccountRequest {
    /// Validate into `(display_name, phone)`.
    ///
    /// # Errors
    ///
    /// Returns the field-scoped collection when any field fails.
    pub fn validate(self) -> Result<(String, Option<Phone>), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let display_name = self.display_name.trim().to_owned();
        if display_name.is_empty() {
            errors.add("display_name", "display name cannot be empty");
        } else if display_name.len() > MAX_NAME_LENGTH {
            errors.add(
                "display_name",
                format!("display name must be at most {MAX_NAME_LENGTH} characters"),
            );
        }

        let phone = match normalize_optional(self.phone) {
            Some(raw) => Phone::parse(&raw)
                .map_err(|e| errors.add("phone", e.to_string()))
                .ok(),
            None => None,
        };

        errors.into_result((display_name, phone))
    }
}

/// Outbound account shape. Never exposes anything beyond the profile.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: Email,
    pub display_name: String,
    pub phone: Option<Phone>,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            display_name: account.display_name,
            phone: account.phone,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> CreateAccountRequest {
        CreateAccountRequest {
            email: "seller@example.com".to_owned(),
            display_name: "Sample Seller".to_owned(),
            phone: Some("+1 (555) 867-5309".to_owned()),
            role: Some("seller".to_owned()),
        }
    }

    #[test]
    fn test_valid_request() {
        let new = request().validate().unwrap();
        assert_eq!(new.email.as_str(), "seller@example.com");
        assert_eq!(new.phone.unwrap().as_str(), "+15558675309");
        assert_eq!(new.role, AccountRole::Seller);
        assert!(new.id.is_none());
    }

    #[test]
    fn test_role_defaults_to_customer() {
        let mut req = request();
        req.role = None;
        assert_eq!(req.validate().unwrap().role, AccountRole::Customer);
    }

    #[test]
    fn test_collects_multiple_field_errors() {
        let req = CreateAccountRequest {
            email: "not-an-email".to_owned(),
            display_name: "  ".to_owned(),
            phone: Some("what".to_owned()),
            role: Some("wizard".to_owned()),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field("email").len(), 1);
        assert_eq!(errors.field("display_name").len(), 1);
        assert_eq!(errors.field("phone").len(), 1);
        assert_eq!(errors.field("role").len(), 1);
    }

    #[test]
    fn test_empty_phone_treated_as_absent() {
        let mut req = request();
        req.phone = Some("   ".to_owned());
        assert!(req.validate().unwrap().phone.is_none());
    }

    #[test]
    fn test_response_serialized_keys() {
        let account = Account {
            id: AccountId::parse("abcdefghjkmn").unwrap(),
            email: Email::parse("a@b.co").unwrap(),
            display_name: "A".to_owned(),
            phone: None,
            role: AccountRole::Customer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["created_at", "display_name", "email", "id", "phone", "role"]
        );
    }
}
