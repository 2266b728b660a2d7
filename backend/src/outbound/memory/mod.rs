//! Process-local user store.
//!
//! Used when no database URL is configured and by HTTP tests. It enforces the
//! same email uniqueness constraint as the `users` table, so the service
//! behaves identically over either adapter. The lock is only held inside
//! synchronous sections, never across an await.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, UserProfile};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<UserId, UserProfile>,
    next_id: i64,
}

impl Table {
    fn email_owner(&self, email: &str) -> Option<UserId> {
        self.rows
            .iter()
            .find(|(_, profile)| profile.email() == email)
            .map(|(id, _)| *id)
    }
}

/// In-memory implementation of the `UserRepository` port.
///
/// Identifiers start at 1 and are never reused, mirroring a `BIGSERIAL`
/// sequence.
///
/// # Examples
/// ```
/// use user_registry::domain::UserProfile;
/// use user_registry::domain::ports::UserRepository;
/// use user_registry::outbound::memory::InMemoryUserRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryUserRepository::default();
/// let id = repo
///     .insert(&UserProfile::new("Ada", "ada@example.com"))
///     .await
///     .expect("insert succeeds");
/// assert_eq!(id.get(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryUserRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    ///
    /// # Errors
    /// Fails only if a previous holder of the lock panicked.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.rows.len())
    }

    /// Whether the store holds no users.
    ///
    /// # Errors
    /// Fails only if a previous holder of the lock panicked.
    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.rows.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user table lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .get(&id)
            .map(|profile| User::new(id, profile.clone())))
    }

    async fn find_id_by_email(&self, email: &str) -> Result<Option<UserId>, UserPersistenceError> {
        Ok(self.lock()?.email_owner(email))
    }

    async fn insert(&self, profile: &UserProfile) -> Result<UserId, UserPersistenceError> {
        let mut table = self.lock()?;
        if table.email_owner(profile.email()).is_some() {
            return Err(UserPersistenceError::duplicate_email());
        }
        let id = UserId::new(table.next_id);
        table.next_id += 1;
        table.rows.insert(id, profile.clone());
        Ok(id)
    }

    async fn update(
        &self,
        id: UserId,
        profile: &UserProfile,
    ) -> Result<bool, UserPersistenceError> {
        let mut table = self.lock()?;
        if !table.rows.contains_key(&id) {
            return Ok(false);
        }
        if table
            .email_owner(profile.email())
            .is_some_and(|owner| owner != id)
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        table.rows.insert(id, profile.clone());
        Ok(true)
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }
}
