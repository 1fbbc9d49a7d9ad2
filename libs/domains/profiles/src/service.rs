use std::sync::Arc;

use crate::error::{ProfileError, ProfileResult, WriteOp};
use crate::models::{ProfileInput, User};
use crate::repository::ProfileRepository;
use crate::validation::validate_profile;

/// Service layer for profile business logic, shared by the JSON API and the
/// HTML pages
pub struct ProfileService<R: ProfileRepository> {
    repository: Arc<R>,
}

// Clones share the repository, so no `R: Clone` bound
impl<R: ProfileRepository> Clone for ProfileService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the input and insert a new user.
    ///
    /// Nothing is written unless every field is valid and the email is free.
    pub async fn create_profile(&self, input: ProfileInput) -> ProfileResult<User> {
        let new_user = validate_profile(&input)?;

        if self.repository.find_by_email(&new_user.email).await?.is_some() {
            return Err(ProfileError::DuplicateEmail {
                email: new_user.email,
                op: WriteOp::Create,
            });
        }

        let email = new_user.email.clone();
        let user = self
            .repository
            .insert(new_user)
            .await
            .map_err(|e| duplicate_on_conflict(e, email, WriteOp::Create))?;

        tracing::info!(user_id = user.id, "Created profile");
        Ok(user)
    }

    /// Validate the input and overwrite every field of user `id`.
    ///
    /// Keeping one's own email is not a conflict.
    pub async fn update_profile(&self, id: i32, input: ProfileInput) -> ProfileResult<User> {
        self.get_profile(id).await?;

        let new_user = validate_profile(&input)?;

        let owner = self.repository.find_by_email(&new_user.email).await?;
        if owner.is_some_and(|other| other.id != id) {
            return Err(ProfileError::DuplicateEmail {
                email: new_user.email,
                op: WriteOp::Update,
            });
        }

        let email = new_user.email.clone();
        let user = self
            .repository
            .update(id, new_user)
            .await
            .map_err(|e| duplicate_on_conflict(e, email, WriteOp::Update))?;

        tracing::info!(user_id = user.id, "Updated profile");
        Ok(user)
    }

    /// All users in id order
    pub async fn list_profiles(&self) -> ProfileResult<Vec<User>> {
        self.repository.find_all().await
    }

    pub async fn get_profile(&self, id: i32) -> ProfileResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProfileError::NotFound(id))
    }

    /// Check the backing store is reachable
    pub async fn ping(&self) -> ProfileResult<()> {
        self.repository.ping().await
    }
}

// A concurrent writer can take the email between the lookup and the write
fn duplicate_on_conflict(err: ProfileError, email: String, op: WriteOp) -> ProfileError {
    match err {
        ProfileError::ConstraintViolation(_) => ProfileError::DuplicateEmail { email, op },
        other => other,
    }
}
