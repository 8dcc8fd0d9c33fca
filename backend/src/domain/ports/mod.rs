//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`AccountDirectory`], [`PageRegistry`], [`LinkCollection`])
//! are consumed by inbound adapters; driven ports ([`UserRepository`],
//! [`PageRepository`]) are implemented by storage adapters.

mod account_directory;
mod link_collection;
mod page_registry;
mod page_repository;
mod user_repository;

#[cfg(test)]
pub use account_directory::MockAccountDirectory;
pub use account_directory::{AccountDirectory, AuthSession, LoginRequest, SignupRequest};
#[cfg(test)]
pub use link_collection::MockLinkCollection;
pub use link_collection::LinkCollection;
#[cfg(test)]
pub use page_registry::MockPageRegistry;
pub use page_registry::PageRegistry;
#[cfg(test)]
pub use page_repository::MockPageRepository;
pub use page_repository::{PageRepository, PageRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
