/// Security module
/// Password hashing and the authorization guard for mutations

pub mod authorization;
pub mod password;

pub use authorization::{authorize, Action, Actor, Decision, DenyReason};
pub use password::{hash_password, verify_password};
