use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProfileError, ProfileResult};
use crate::models::{NewUser, User};

/// Persistence for the `users` table.
///
/// Implementations own id assignment and enforce the unique email
/// constraint; a write that would break it fails with
/// [`ProfileError::ConstraintViolation`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// All users in id order
    async fn find_all(&self) -> ProfileResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> ProfileResult<Option<User>>;

    /// Exact match on an already-normalized email
    async fn find_by_email(&self, email: &str) -> ProfileResult<Option<User>>;

    /// Insert a new row and return it with its assigned id
    async fn insert(&self, user: NewUser) -> ProfileResult<User>;

    /// Replace every field except the id
    async fn update(&self, id: i32, user: NewUser) -> ProfileResult<User>;

    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> ProfileResult<()>;
}

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, User>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of ProfileRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_all(&self) -> ProfileResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> ProfileResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> ProfileResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> ProfileResult<User> {
        let mut table = self.table.write().await;

        if table.email_taken(&user.email, None) {
            return Err(ProfileError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint on email: {}",
                user.email
            )));
        }

        table.last_id += 1;
        let user = User::from_new(table.last_id, user);
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: i32, user: NewUser) -> ProfileResult<User> {
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Err(ProfileError::NotFound(id));
        }
        if table.email_taken(&user.email, Some(id)) {
            return Err(ProfileError::ConstraintViolation(format!(
                "duplicate key value violates unique constraint on email: {}",
                user.email
            )));
        }

        let user = User::from_new(id, user);
        table.rows.insert(id, user.clone());

        Ok(user)
    }

    async fn ping(&self) -> ProfileResult<()> {
        Ok(())
    }
}
