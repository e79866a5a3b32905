//! Session domain - authenticated identity and local credential checks.

mod auth_state;
mod credentials;
mod identity;

pub use auth_state::AuthState;
pub use credentials::{LoginCredentials, SignupDetails, MIN_PASSWORD_LENGTH};
pub use identity::{Session, UserProfile};
