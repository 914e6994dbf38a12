//! Business logic over the credential store.

pub mod users;

pub use users::UserService;
