//! Session gate

use std::sync::Arc;

use platter::menu::RestaurantId;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    auth::{
        errors::AuthError,
        form::{AuthForm, AuthRequest},
        models::{Credentials, User},
        provider::AuthProvider,
    },
    errors::UserFacing,
};

/// A view the user can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Restaurant(RestaurantId),
    Checkout,
    OrderConfirmation,
}

/// What the router should do with a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether `user` may see `route`.
///
/// Signed-in users are sent home from the login view; everything except the
/// order confirmation requires a session.
pub fn guard(route: Route, user: Option<&User>) -> RouteDecision {
    match (route, user) {
        (Route::Login, Some(_)) => RouteDecision::Redirect(Route::Home),
        (Route::Home | Route::Restaurant(_) | Route::Checkout, None) => {
            RouteDecision::Redirect(Route::Login)
        }
        _ => RouteDecision::Allow,
    }
}

/// Tracks the signed-in identity for the lifetime of the application.
pub struct SessionGate {
    auth: Arc<dyn AuthProvider>,
    identity: Arc<watch::Sender<Option<User>>>,
    listener: JoinHandle<()>,
}

impl SessionGate {
    /// Start following the provider's session changes.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn(auth: Arc<dyn AuthProvider>) -> Self {
        let mut changes = auth.session_changes();
        let identity = Arc::new(watch::Sender::new(changes.borrow_and_update().clone()));

        let listener = tokio::spawn({
            let identity = Arc::clone(&identity);

            async move {
                while changes.changed().await.is_ok() {
                    let user = changes.borrow_and_update().clone();

                    debug!(signed_in = user.is_some(), "session changed");

                    identity.send_replace(user);
                }
            }
        });

        Self {
            auth,
            identity,
            listener,
        }
    }

    /// Ask the provider for an existing session. Failures count as signed out.
    pub async fn restore(&self) -> Option<User> {
        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "failed to restore session");
                None
            }
        };

        self.identity.send_replace(user.clone());

        user
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.identity.borrow().clone()
    }

    /// Identity changes, for views that show the current user.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.identity.subscribe()
    }

    /// Decide whether the current user may see `route`.
    pub fn guard(&self, route: Route) -> RouteDecision {
        guard(route, self.identity.borrow().as_ref())
    }

    /// Sign in directly with credentials.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self.auth.sign_in(credentials).await?;

        info!(user_id = %user.id, "signed in");

        self.identity.send_replace(Some(user.clone()));

        Ok(user)
    }

    /// Sign out. The identity is cleared even if the provider call fails.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`AuthError`].
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = self.auth.sign_out().await;

        self.identity.send_replace(None);

        result
    }

    /// Submit the login view's form.
    ///
    /// Problems are written to the form's banner rather than returned. After a
    /// sign-up the form switches to sign-in and asks the user to verify their
    /// e-mail.
    pub async fn submit(&self, form: &mut AuthForm) -> Option<User> {
        form.message = None;

        let request = match form.request() {
            Ok(request) => request,
            Err(error) => {
                form.message = Some(error.user_message());
                return None;
            }
        };

        match request {
            AuthRequest::SignIn(credentials) => match self.sign_in(&credentials).await {
                Ok(user) => Some(user),
                Err(error) => {
                    warn!(%error, "sign in failed");
                    form.message = Some(error.user_message());
                    None
                }
            },
            AuthRequest::SignUp(registration) => {
                match self.auth.sign_up(&registration).await {
                    Ok(user) => {
                        info!(user_id = %user.id, "signed up");
                        form.signed_up();
                    }
                    Err(error) => {
                        warn!(%error, "sign up failed");
                        form.message = Some(error.user_message());
                    }
                }

                None
            }
        }
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
