//! Admin account provisioning.
//!
//! Open registration never creates admins; this command is the operator
//! path.

use tracing::info;

use bazaar_backend::config::BackendConfig;
use bazaar_backend::db;
use bazaar_backend::services::accounts;
use bazaar_core::Email;

/// Provision a new admin account.
///
/// # Errors
///
/// Returns an error if configuration is missing, the email is invalid or
/// already registered, or the database operation fails.
pub async fn create(email: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let email = Email::parse(email)?;

    let config = BackendConfig::from_env()?;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;

    let account = accounts::provision_admin(&pool, email, name.to_owned()).await?;
    info!(account_id = %account.id, email = %account.email, "admin account created");
    Ok(())
}
