//! Auth endpoints.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{AuthError, AuthProvider, Credentials, Registration, User},
    backend::{
        BackendError, RestBackend, check,
        rows::{PasswordGrant, ProfileRow, SignUpResponse, TokenResponse, UserRow},
    },
};

#[async_trait]
impl AuthProvider for RestBackend {
    #[instrument(skip_all, fields(email = %credentials.email))]
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let response = self
            .request(Method::POST, "auth/v1/token?grant_type=password")
            .json(&PasswordGrant {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(BackendError::from)?;

        let token: TokenResponse = check(response)
            .await?
            .json()
            .await
            .map_err(BackendError::from)?;

        let user = User::from(token.user);

        self.start_session(token.access_token, user.clone());

        info!(user_id = %user.id, "session started");

        Ok(user)
    }

    #[instrument(skip_all, fields(email = %registration.credentials.email))]
    async fn sign_up(&self, registration: &Registration) -> Result<User, AuthError> {
        let credentials = &registration.credentials;

        let response = self
            .request(Method::POST, "auth/v1/signup")
            .json(&PasswordGrant {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(BackendError::from)?;

        let user = check(response)
            .await?
            .json::<SignUpResponse>()
            .await
            .map_err(BackendError::from)?
            .into_user();

        if let Err(error) = self
            .create_profile(&user, &credentials.email, &registration.full_name)
            .await
        {
            warn!(%error, user_id = %user.id, "failed to create user profile");
        }

        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let result = match self.access_token() {
            Some(_) => match self.request(Method::POST, "auth/v1/logout").send().await {
                Ok(response) => check(response).await.map(drop),
                Err(error) => Err(BackendError::from(error)),
            },
            None => Ok(()),
        };

        self.end_session();

        result.map_err(AuthError::from)
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        if self.access_token().is_none() {
            return Ok(None);
        }

        let response = self
            .request(Method::GET, "auth/v1/user")
            .send()
            .await
            .map_err(BackendError::from)?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!("session expired");
            self.end_session();

            return Ok(None);
        }

        let row: UserRow = check(response)
            .await?
            .json()
            .await
            .map_err(BackendError::from)?;

        Ok(Some(row.into()))
    }

    fn session_changes(&self) -> watch::Receiver<Option<User>> {
        self.changes.subscribe()
    }
}

impl RestBackend {
    async fn create_profile(
        &self,
        user: &User,
        email: &str,
        full_name: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, "rest/v1/user_profiles")
            .header("Prefer", "return=minimal")
            .json(&[ProfileRow {
                id: user.id,
                email,
                full_name,
            }])
            .send()
            .await?;

        check(response).await?;

        Ok(())
    }
}
