//! Domain entities, ports, and services.
//!
//! Everything in here is transport and store agnostic: inbound adapters map
//! HTTP to the driving ports, outbound adapters implement the driven ports
//! against MongoDB.

pub mod account_service;
pub mod credentials;
pub mod error;
pub mod page;
pub mod page_service;
pub mod ports;
pub mod token;
pub mod user;

pub use self::account_service::AccountService;
pub use self::credentials::{CredentialError, PasswordHasher};
pub use self::error::{Error, ErrorCode};
pub use self::page::{
    Link, LinkDraft, LinkId, Page, PageDraft, PageId, PageUpdate, PageValidationError,
};
pub use self::page_service::PageService;
pub use self::token::{AccessToken, TokenError, TokenService};
pub use self::user::{Email, Password, User, UserId, UserValidationError, Username};

/// Convenient result alias for fallible domain operations.
pub type ApiResult<T> = Result<T, Error>;
