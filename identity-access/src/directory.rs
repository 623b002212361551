use crate::{error::*, models::*};
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// Narrow identity lookup contract consumed by the engine.
///
/// Trashed accounts are invisible: resolving one answers `UserNotFound`.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn resolve_user(&self, id: Uuid) -> IdentityResult<UserAccount>;

    async fn role_of(&self, id: Uuid) -> IdentityResult<Role> {
        Ok(self.resolve_user(id).await?.role)
    }
}

/// In-memory directory for development and testing.
pub struct InMemoryDirectory {
    users: DashMap<Uuid, UserAccount>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Register an account and return its id.
    pub fn register(&self, account: UserAccount) -> Uuid {
        let id = account.id;
        self.users.insert(id, account);
        id
    }

    pub fn deactivate(&self, id: Uuid) {
        if let Some(mut account) = self.users.get_mut(&id) {
            account.active = false;
        }
    }

    pub fn trash(&self, id: Uuid, actor: Uuid) {
        if let Some(mut account) = self.users.get_mut(&id) {
            account.meta.trash(actor);
        }
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn resolve_user(&self, id: Uuid) -> IdentityResult<UserAccount> {
        self.users
            .get(&id)
            .filter(|account| !account.meta.deleted)
            .map(|account| account.value().clone())
            .ok_or(IdentityError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trashed_accounts_do_not_resolve() {
        let directory = InMemoryDirectory::new();
        let admin = Uuid::new_v4();
        let id = directory.register(UserAccount::new("Dr. Vera Lind", Role::Doctor, admin));

        assert_eq!(directory.role_of(id).await.unwrap(), Role::Doctor);

        directory.trash(id, admin);
        assert!(matches!(
            directory.resolve_user(id).await,
            Err(IdentityError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn deactivated_accounts_still_resolve() {
        let directory = InMemoryDirectory::new();
        let admin = Uuid::new_v4();
        let id = directory.register(UserAccount::new("Paul Osei", Role::Patient, admin));

        directory.deactivate(id);
        let account = directory.resolve_user(id).await.unwrap();
        assert!(!account.active);
    }
}
