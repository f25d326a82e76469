//! Auth and persistence against a Supabase-style backend: GoTrue for email
//! and password sessions, PostgREST for the single-row `user_data` document.

pub mod auth;
pub mod store;

pub use auth::{AuthClient, AuthSession};
pub use store::UserStore;
