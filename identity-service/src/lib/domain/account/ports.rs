use async_trait::async_trait;

use crate::account::errors::AccountLookupError;
use crate::account::errors::RegistrationError;
use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::BuyerRegistration;
use crate::account::models::EmailAddress;
use crate::account::models::ExistenceField;
use crate::account::models::ExistenceQuery;
use crate::account::models::RegisteredAccount;
use crate::account::models::Role;
use crate::account::models::StoredCredentials;
use crate::account::models::VendorRegistration;

/// Port for account registration and lookup.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a vendor account with its business profile.
    ///
    /// # Errors
    /// * `Validation` - One or more fields are missing or malformed
    /// * `Conflict` - Email, mobile, or NTN is already registered
    /// * `Persistence` - Store failure or timeout; nothing was written
    async fn register_vendor(
        &self,
        registration: VendorRegistration,
    ) -> Result<RegisteredAccount, RegistrationError>;

    /// Register a buyer account with its company profile.
    ///
    /// # Errors
    /// * `Validation` - One or more fields are missing or malformed
    /// * `Conflict` - Email or mobile is already registered
    /// * `Persistence` - Store failure or timeout; nothing was written
    async fn register_buyer(
        &self,
        registration: BuyerRegistration,
    ) -> Result<RegisteredAccount, RegistrationError>;

    /// Advisory probe for an already registered value.
    ///
    /// Best effort: store failures are logged and reported as `false`.
    async fn check_exists(&self, field: ExistenceField, value: &str, scope: Option<Role>) -> bool;

    /// Read an account and its profile.
    ///
    /// # Errors
    /// * `NotFound` - No account with this ID
    /// * `Persistence` - Store failure or timeout
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountLookupError>;
}

/// Persistence operations for the account aggregate.
///
/// Implementations enforce uniqueness of email and mobile across all accounts,
/// and of NTN across vendor accounts, atomically with the write.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account and its profile as one unit.
    ///
    /// # Errors
    /// * `Conflict` - A unique constraint fired; flags name the constraint
    /// * `Timeout` - The store did not answer in time
    /// * `Database` - Any other failure; nothing was written
    async fn create(&self, account: Account) -> Result<Account, RepositoryError>;

    /// Retrieve login credentials by normalized email, across roles.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, RepositoryError>;

    /// Retrieve an account and its profile by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;

    /// Whether a normalized value is already registered.
    async fn exists(&self, query: &ExistenceQuery) -> Result<bool, RepositoryError>;
}
