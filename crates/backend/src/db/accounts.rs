//! Account repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{AccountId, AccountRole, Email, Phone, ShortId};

use super::{RepositoryError, allocator, unique_constraint};
use crate::models::{Account, NewAccount};

/// Database row for an account.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: AccountId,
    email: Email,
    display_name: String,
    phone: Option<Phone>,
    role: AccountRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            phone: row.phone,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_COLUMNS: &str = "id, email, display_name, phone, role, created_at, updated_at";

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new account under an allocator-issued identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists,
    /// `RepositoryError::IdSpaceExhausted` if identifier allocation gives
    /// up, or `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewAccount) -> Result<Account, RepositoryError> {
        let NewAccount {
            id,
            email,
            display_name,
            phone,
            role,
        } = new;

        allocator::insert_with_unique_id(id.map(AccountId::into_inner), |candidate| {
            self.insert_row(candidate, &email, &display_name, phone.as_ref(), role)
        })
        .await
    }

    async fn insert_row(
        &self,
        id: ShortId,
        email: &Email,
        display_name: &str,
        phone: Option<&Phone>,
        role: AccountRole,
    ) -> Result<Account, RepositoryError> {
        let row: AccountRow = sqlx::query_as(
            r"
            INSERT INTO account (id, email, display_name, phone, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, display_name, phone, role, created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(email.as_str())
        .bind(display_name)
        .bind(phone.map(Phone::as_str))
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match unique_constraint(&e).as_deref() {
            Some("account_pkey") => RepositoryError::IdCollision,
            Some(_) => RepositoryError::Conflict("email already exists".to_owned()),
            None => RepositoryError::Database(e),
        })?;

        Ok(row.into())
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM account WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM account WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List accounts holding a given role, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_role(&self, role: AccountRole) -> Result<Vec<Account>, RepositoryError> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM account WHERE role = $1 ORDER BY created_at ASC"
        ))
        .bind(role)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update an account's display name and phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: &AccountId,
        display_name: &str,
        phone: Option<&Phone>,
    ) -> Result<Account, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r"
            UPDATE account
            SET display_name = $2, phone = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, email, display_name, phone, role, created_at, updated_at
            ",
        )
        .bind(id.as_str())
        .bind(display_name)
        .bind(phone.map(Phone::as_str))
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete an account.
    ///
    /// # Returns
    ///
    /// Returns `true` if the account was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including
    /// foreign-key restriction when the account still owns stores).
    pub async fn delete(&self, id: &AccountId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
