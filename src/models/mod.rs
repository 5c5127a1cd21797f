//! Data models and submitted forms

pub mod book;
pub mod form;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use form::FormErrors;
pub use request::{NewRequest, Request};
pub use user::{LoginForm, NewUser, SessionUser, User};
