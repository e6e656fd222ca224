//! Account services.

use sqlx::PgPool;

use bazaar_core::{AccountId, AccountRole, Email};

use crate::db::AccountRepository;
use crate::error::AppError;
use crate::models::NewAccount;
use crate::requests::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};
use crate::services::RequestContext;

/// Register a new customer or seller account.
///
/// Open registration never mints admins; those are provisioned by operators
/// through [`provision_admin`].
///
/// # Errors
///
/// Returns `AppError::Validation` for bad input, `AppError::Forbidden` for
/// an attempted admin registration, `AppError::Conflict` if the email is
/// taken, or a persistence error.
pub async fn register(
    pool: &PgPool,
    request: CreateAccountRequest,
) -> Result<AccountResponse, AppError> {
    let new = request.validate()?;

    if new.role.is_admin() {
        return Err(AppError::Forbidden(
            "admin accounts are provisioned by operators".to_owned(),
        ));
    }

    let account = AccountRepository::new(pool).create(new).await?;
    tracing::info!(account_id = %account.id, role = %account.role, "account registered");
    Ok(account.into())
}

/// Create an admin account. Operator tooling only - no request context.
///
/// # Errors
///
/// Returns `AppError::Conflict` if the email is taken, or a persistence
/// error.
pub async fn provision_admin(
    pool: &PgPool,
    email: Email,
    display_name: String,
) -> Result<AccountResponse, AppError> {
    let account = AccountRepository::new(pool)
        .create(NewAccount {
            id: None,
            email,
            display_name,
            phone: None,
            role: AccountRole::Admin,
        })
        .await?;
    tracing::info!(account_id = %account.id, "admin account provisioned");
    Ok(account.into())
}

/// Fetch an account. Callers may read themselves; admins may read anyone.
///
/// # Errors
///
/// Returns `AppError::Forbidden` or `AppError::NotFound`.
pub async fn get(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &AccountId,
) -> Result<AccountResponse, AppError> {
    ctx.require_self_or_admin(id)?;

    let account = AccountRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {id}")))?;
    Ok(account.into())
}

/// Update an account's profile. Self or admin.
///
/// # Errors
///
/// Returns `AppError::Forbidden`, `AppError::Validation`, or
/// `AppError::NotFound`.
pub async fn update_profile(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &AccountId,
    request: UpdateAccountRequest,
) -> Result<AccountResponse, AppError> {
    ctx.require_self_or_admin(id)?;
    let (display_name, phone) = request.validate()?;

    let account = AccountRepository::new(pool)
        .update_profile(id, &display_name, phone.as_ref())
        .await?;
    Ok(account.into())
}

/// Delete an account. Self or admin.
///
/// # Errors
///
/// Returns `AppError::Forbidden` or `AppError::NotFound`; deleting an
/// account that still owns stores surfaces the database restriction.
pub async fn delete(
    ctx: &RequestContext,
    pool: &PgPool,
    id: &AccountId,
) -> Result<(), AppError> {
    ctx.require_self_or_admin(id)?;

    let deleted = AccountRepository::new(pool).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("account {id}")));
    }
    tracing::info!(account_id = %id, "account deleted");
    Ok(())
}
