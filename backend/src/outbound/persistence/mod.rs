//! MongoDB adapters for the driven ports.
//!
//! The design leans on single-document atomicity: link mutations are
//! `$push`/positional `$set`/`$pull`/`$inc` updates, and the "at most one"
//! invariants are enforced by the unique indexes created in
//! [`ensure_indexes`], never by read-then-write checks.

pub mod documents;
mod mongo_page_repository;
mod mongo_user_repository;

pub use mongo_page_repository::MongoPageRepository;
pub use mongo_user_repository::MongoUserRepository;

use bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};

use documents::{PAGES_COLLECTION, PageDocument, USERS_COLLECTION, UserDocument};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether a store error is a unique-index violation.
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Whether a store error means the server could not be reached at all.
pub(crate) fn is_connection_error(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
    )
}

fn unique_index(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

/// Create the indexes the invariants rely on. Idempotent; run at startup.
///
/// Users: `email` and `username` unique. Pages: `user_id` unique (one page
/// per user, and the guard behind the creation-race recovery), `username`
/// non-unique for the public lookup.
pub async fn ensure_indexes(database: &Database) -> mongodb::error::Result<()> {
    database
        .collection::<UserDocument>(USERS_COLLECTION)
        .create_indexes([
            unique_index(doc! { "email": 1 }),
            unique_index(doc! { "username": 1 }),
        ])
        .await?;
    database
        .collection::<PageDocument>(PAGES_COLLECTION)
        .create_indexes([
            unique_index(doc! { "user_id": 1 }),
            IndexModel::builder().keys(doc! { "username": 1 }).build(),
        ])
        .await?;
    Ok(())
}
