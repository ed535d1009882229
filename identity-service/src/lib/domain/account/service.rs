use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;

use crate::account::errors::AccountLookupError;
use crate::account::errors::ConflictError;
use crate::account::errors::RegistrationError;
use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::BuyerRegistration;
use crate::account::models::ExistenceField;
use crate::account::models::ExistenceQuery;
use crate::account::models::NewAccount;
use crate::account::models::RegisteredAccount;
use crate::account::models::Role;
use crate::account::models::VendorRegistration;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::domain::deadline;

/// Domain service implementation for account registration.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Credential hashing
    /// * `store_timeout` - Upper bound on each store call
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>, store_timeout: Duration) -> Self {
        Self {
            repository,
            authenticator,
            store_timeout,
        }
    }

    async fn register(&self, account: NewAccount) -> Result<RegisteredAccount, RegistrationError> {
        let role = account.role();

        let conflict = self.find_conflicts(&account).await?;
        if conflict.any() {
            tracing::info!(role = %role, conflict = %conflict, "Registration rejected by pre-check");
            return Err(RegistrationError::Conflict(conflict));
        }

        let password_hash = self.hash_password(&account).await?;
        let account = account.into_account(password_hash);

        // The store's unique constraints are authoritative; a conflict here means
        // a concurrent registration won the race after our pre-check.
        let created = deadline::within(self.store_timeout, self.repository.create(account))
            .await
            .map_err(|e| {
                match &e {
                    RepositoryError::Conflict(conflict) => tracing::info!(
                        role = %role,
                        conflict = %conflict,
                        "Registration rejected by store constraint"
                    ),
                    _ => tracing::error!(role = %role, error = %e, "Failed to persist account"),
                }
                RegistrationError::from(e)
            })?;

        tracing::info!(account_id = %created.id, role = %role, "Account registered");

        Ok(RegisteredAccount {
            id: created.id,
            role,
        })
    }

    /// Advisory uniqueness check. All fields are probed so every conflict is reported.
    async fn find_conflicts(&self, account: &NewAccount) -> Result<ConflictError, RegistrationError> {
        let email = ExistenceQuery::email(&account.email);
        let mobile = ExistenceQuery::mobile(&account.mobile);
        let ntn = account.profile.ntn().map(ExistenceQuery::ntn);

        let (email_exists, mobile_exists, ntn_exists) = tokio::try_join!(
            self.probe(&email),
            self.probe(&mobile),
            async {
                match &ntn {
                    Some(query) => self.probe(query).await,
                    None => Ok(false),
                }
            }
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Uniqueness pre-check failed");
            RegistrationError::from(e)
        })?;

        Ok(ConflictError {
            email_exists,
            mobile_exists,
            ntn_exists,
        })
    }

    async fn probe(&self, query: &ExistenceQuery) -> Result<bool, RepositoryError> {
        deadline::within(self.store_timeout, self.repository.exists(query)).await
    }

    async fn hash_password(&self, account: &NewAccount) -> Result<String, RegistrationError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = account.password.clone();

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| RegistrationError::Persistence(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                RegistrationError::Persistence(e.to_string())
            })
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn register_vendor(
        &self,
        registration: VendorRegistration,
    ) -> Result<RegisteredAccount, RegistrationError> {
        self.register(registration.validate()?).await
    }

    async fn register_buyer(
        &self,
        registration: BuyerRegistration,
    ) -> Result<RegisteredAccount, RegistrationError> {
        self.register(registration.validate()?).await
    }

    async fn check_exists(&self, field: ExistenceField, value: &str, scope: Option<Role>) -> bool {
        if field == ExistenceField::Ntn && scope == Some(Role::Buyer) {
            return false;
        }

        let Some(query) = ExistenceQuery::new(field, value, scope) else {
            return false;
        };

        self.probe(&query).await.unwrap_or_else(|e| {
            tracing::warn!(field = ?field, error = %e, "Existence check failed");
            false
        })
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountLookupError> {
        deadline::within(self.store_timeout, self.repository.find_by_id(id))
            .await?
            .ok_or(AccountLookupError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::account::models::EmailAddress;
    use crate::account::models::Password;
    use crate::account::models::Profile;
    use crate::account::models::StoredCredentials;

    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, account: Account) -> Result<Account, RepositoryError>;
            async fn find_credentials_by_email(&self, email: &EmailAddress) -> Result<Option<StoredCredentials>, RepositoryError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
            async fn exists(&self, query: &ExistenceQuery) -> Result<bool, RepositoryError>;
        }
    }

    fn service(repository: MockTestAccountRepository) -> AccountService<MockTestAccountRepository> {
        AccountService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(b"test_secret_key_at_least_32_bytes!")),
            Duration::from_secs(5),
        )
    }

    fn vendor() -> VendorRegistration {
        VendorRegistration {
            email: Some("v@x.com".to_string()),
            mobile: Some("+1000".to_string()),
            password: Some(Password::new("p1")),
            business_name: Some("Acme".to_string()),
            year_of_establishment: Some(2001.into()),
            business_category: Some("Retail".to_string()),
            business_type: Some("Corporation".to_string()),
            address: Some("1 Main St".to_string()),
            country: Some("PK".to_string()),
            state: Some("Punjab".to_string()),
            city: Some("Lahore".to_string()),
            ntn: Some("NTN1".to_string()),
            gender: Some("Male".to_string()),
            ..VendorRegistration::default()
        }
    }

    fn buyer() -> BuyerRegistration {
        BuyerRegistration {
            email: Some("b@x.com".to_string()),
            mobile: Some("+2000".to_string()),
            password: Some(Password::new("p2")),
            name: Some("Sara".to_string()),
            company_name: Some("Buyco".to_string()),
            designation: Some("Owner".to_string()),
            address: Some("2 Side St".to_string()),
            country: Some("PK".to_string()),
            state: Some("Sindh".to_string()),
            city: Some("Karachi".to_string()),
            gender: Some("Female".to_string()),
            ..BuyerRegistration::default()
        }
    }

    #[tokio::test]
    async fn test_register_vendor_success() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_exists().times(3).returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(|account| {
                account.email.as_str() == "v@x.com"
                    && account.role() == Role::Vendor
                    && account.password_hash.starts_with("$argon2id")
                    && account.password_hash != "p1"
            })
            .times(1)
            .returning(|account| Ok(account));

        let result = service(repository).register_vendor(vendor()).await;

        let registered = result.expect("registration succeeds");
        assert_eq!(registered.role, Role::Vendor);
    }

    #[tokio::test]
    async fn test_register_buyer_skips_ntn_probe() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_exists()
            .withf(|query| query.field != ExistenceField::Ntn)
            .times(2)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(|account| matches!(account.profile, Profile::Buyer(_)))
            .times(1)
            .returning(|account| Ok(account));

        let registered = service(repository)
            .register_buyer(buyer())
            .await
            .expect("registration succeeds");
        assert_eq!(registered.role, Role::Buyer);
    }

    #[tokio::test]
    async fn test_register_reports_every_precheck_conflict() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_exists()
            .times(3)
            .returning(|query| Ok(query.field != ExistenceField::Mobile));
        repository.expect_create().times(0);

        let result = service(repository).register_vendor(vendor()).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Conflict(ConflictError {
                email_exists: true,
                mobile_exists: false,
                ntn_exists: true,
            }))
        ));
    }

    #[tokio::test]
    async fn test_store_conflict_overrides_clean_precheck() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_exists().times(3).returning(|_| Ok(false));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict(ConflictError::email())));

        let result = service(repository).register_vendor(vendor()).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Conflict(ConflictError {
                email_exists: true,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_exists().times(2).returning(|_| Ok(false));
        repository
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Database("connection reset".to_string())));

        let result = service(repository).register_buyer(buyer()).await;

        assert!(matches!(result, Err(RegistrationError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_exists().times(0);
        repository.expect_create().times(0);

        let input = BuyerRegistration {
            email: Some("nope".to_string()),
            designation: Some("Intern".to_string()),
            ..buyer()
        };

        let result = service(repository).register_buyer(input).await;

        match result {
            Err(RegistrationError::Validation(error)) => {
                assert_eq!(error.field_names(), vec!["email", "designation"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_check_exists_is_advisory() {
        let mut repository = MockTestAccountRepository::new();

        repository
            .expect_exists()
            .withf(|query| query.value == "v@x.com" && query.scope == Some(Role::Vendor))
            .times(1)
            .returning(|_| Err(RepositoryError::Timeout));

        let service = service(repository);

        assert!(
            !service
                .check_exists(ExistenceField::Email, "V@X.com", Some(Role::Vendor))
                .await
        );
        // Malformed values and buyer-scoped NTNs never hit the store
        assert!(!service.check_exists(ExistenceField::Email, "nope", None).await);
        assert!(
            !service
                .check_exists(ExistenceField::Ntn, "NTN1", Some(Role::Buyer))
                .await
        );
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut repository = MockTestAccountRepository::new();

        repository.expect_find_by_id().times(1).returning(|_| Ok(None));

        let result = service(repository).get_account(&AccountId::new()).await;

        assert!(matches!(result, Err(AccountLookupError::NotFound(_))));
    }
}
