//! Auth provider.

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::watch;

use crate::auth::{
    errors::AuthError,
    models::{Credentials, Registration, User},
};

#[automock]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with an e-mail and password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError>;

    /// Create an account. The user may still need to confirm their e-mail.
    async fn sign_up(&self, registration: &Registration) -> Result<User, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// The user of the current session, if it is still valid.
    async fn current_user(&self) -> Result<Option<User>, AuthError>;

    /// Session changes, published whenever a user signs in or out.
    fn session_changes(&self) -> watch::Receiver<Option<User>>;
}
