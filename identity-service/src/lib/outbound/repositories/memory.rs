use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::account::errors::ConflictError;
use crate::account::errors::RepositoryError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::ExistenceField;
use crate::account::models::ExistenceQuery;
use crate::account::models::Role;
use crate::account::models::StoredCredentials;
use crate::account::ports::AccountRepository;

/// Process-local account store.
///
/// Uniqueness checks and inserts happen under one lock, so concurrent
/// registrations of the same value see exactly one winner.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    by_email: HashMap<String, AccountId>,
    by_mobile: HashMap<String, AccountId>,
    by_ntn: HashMap<String, AccountId>,
}

impl State {
    fn role_of(&self, id: &AccountId) -> Option<Role> {
        self.accounts.get(id).map(Account::role)
    }

    fn matches(&self, index: &HashMap<String, AccountId>, value: &str, scope: Option<Role>) -> bool {
        match (index.get(value), scope) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(id), Some(role)) => self.role_of(id) == Some(role),
        }
    }
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.state.lock().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut state = self.state.lock();

        let ntn = account.profile.ntn().map(|ntn| ntn.as_str().to_string());
        let conflict = ConflictError {
            email_exists: state.by_email.contains_key(account.email.as_str()),
            mobile_exists: state.by_mobile.contains_key(account.mobile.as_str()),
            ntn_exists: ntn.as_ref().is_some_and(|ntn| state.by_ntn.contains_key(ntn)),
        };
        if conflict.any() {
            return Err(RepositoryError::Conflict(conflict));
        }

        state
            .by_email
            .insert(account.email.as_str().to_string(), account.id);
        state
            .by_mobile
            .insert(account.mobile.as_str().to_string(), account.id);
        if let Some(ntn) = ntn {
            state.by_ntn.insert(ntn, account.id);
        }
        state.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let state = self.state.lock();

        Ok(state
            .by_email
            .get(email.as_str())
            .and_then(|id| state.accounts.get(id))
            .map(|account| StoredCredentials {
                account_id: account.id,
                email: account.email.clone(),
                role: account.role(),
                password_hash: account.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.state.lock().accounts.get(id).cloned())
    }

    async fn exists(&self, query: &ExistenceQuery) -> Result<bool, RepositoryError> {
        let state = self.state.lock();

        Ok(match query.field {
            ExistenceField::Email => state.matches(&state.by_email, &query.value, query.scope),
            ExistenceField::Mobile => state.matches(&state.by_mobile, &query.value, query.scope),
            ExistenceField::Ntn => {
                query.scope != Some(Role::Buyer) && state.by_ntn.contains_key(&query.value)
            }
        })
    }
}
