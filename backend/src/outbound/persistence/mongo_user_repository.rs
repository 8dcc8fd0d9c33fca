//! MongoDB-backed [`UserRepository`] implementation.

use async_trait::async_trait;
use bson::doc;
use mongodb::{Collection, Database};
use tracing::debug;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{User, UserId};

use super::documents::{USERS_COLLECTION, UserDocument};
use super::{is_connection_error, is_duplicate_key};

/// Mongo adapter over the `users` collection.
#[derive(Clone)]
pub struct MongoUserRepository {
    users: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Create a repository over the given database handle.
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection(USERS_COLLECTION),
        }
    }

    async fn find_one(
        &self,
        filter: bson::Document,
    ) -> Result<Option<User>, UserRepositoryError> {
        let document = self
            .users
            .find_one(filter)
            .await
            .map_err(map_store_error)?;
        document
            .map(User::try_from)
            .transpose()
            .map_err(|error| UserRepositoryError::query(error.to_string()))
    }
}

fn map_store_error(error: mongodb::error::Error) -> UserRepositoryError {
    debug!(%error, "user store operation failed");
    if is_connection_error(&error) {
        UserRepositoryError::connection(error.to_string())
    } else {
        UserRepositoryError::query(error.to_string())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        self.users
            .insert_one(UserDocument::from(user))
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_duplicate_key(&error) {
                    UserRepositoryError::Duplicate
                } else {
                    map_store_error(error)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        self.find_one(doc! { "_id": id.to_string() }).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        self.find_one(doc! { "email": email }).await
    }

    async fn exists_with_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, UserRepositoryError> {
        let existing = self
            .users
            .find_one(doc! { "$or": [ { "email": email }, { "username": username } ] })
            .await
            .map_err(map_store_error)?;
        Ok(existing.is_some())
    }
}
