//! Login/logout against the dashboard API and the saved session file.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use domain::models::user::{LoginRequest, SessionUser};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    api_client::{ApiClient, ApiError, ApiRequest, RequestBody},
    message::StatusReporter,
};

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("login response did not include a token")]
    MissingToken,
    #[error("session file error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid session file: {0}")]
    Serde(#[from] serde_json::Error),
}

/// On-disk form of a session.
#[derive(Debug, Serialize, Deserialize)]
struct SavedSession {
    token: String,
    user: Option<SessionUser>,
}

/// The signed-in user and their token, installed on a shared [`ApiClient`].
#[derive(Debug)]
pub struct AuthSession {
    client: ApiClient,
    token: Option<SecretString>,
    user: Option<SessionUser>,
}

impl AuthSession {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            token: None,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        reporter: &dyn StatusReporter,
    ) -> Result<&SessionUser, AuthError> {
        let body = RequestBody::json(LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        let response = self
            .client
            .send(ApiRequest::post(LOGIN_PATH).body(body), reporter)
            .await?;

        let token = match response.field::<String>("token")? {
            Some(token) => token,
            None => response
                .field::<String>("accessToken")?
                .ok_or(AuthError::MissingToken)?,
        };
        let user = response.field::<SessionUser>("user")?.unwrap_or_default();

        info!(email = %user.email, "signed in");
        self.install(SecretString::from(token), user);
        Ok(self.user.get_or_insert_with(SessionUser::default))
    }

    /// Tell the server, then forget the session locally whatever it answered.
    pub async fn logout(&mut self, reporter: &dyn StatusReporter) {
        if self.token.is_some()
            && let Err(e) = self
                .client
                .send(ApiRequest::post(LOGOUT_PATH), reporter)
                .await
        {
            debug!(error = %e, "logout request failed, clearing session anyway");
        }
        self.token = None;
        self.user = None;
        self.client.set_token(None);
        info!("signed out");
    }

    fn install(&mut self, token: SecretString, user: SessionUser) {
        self.client
            .set_token(Some(SecretString::from(token.expose_secret().to_string())));
        self.token = Some(token);
        self.user = Some(user);
    }

    /// Write the session so the next run starts signed in.
    pub fn save(&self, path: &Path) -> Result<(), AuthError> {
        let Some(token) = &self.token else {
            return Self::forget(path);
        };
        let saved = SavedSession {
            token: token.expose_secret().to_string(),
            user: self.user.clone(),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = open_private(path)?;
        file.write_all(&serde_json::to_vec_pretty(&saved)?)?;
        Ok(())
    }

    /// Restore a saved session. Returns false when there is none.
    pub fn restore(&mut self, path: &Path) -> Result<bool, AuthError> {
        if !path.exists() {
            return Ok(false);
        }
        let saved: SavedSession = serde_json::from_slice(&fs::read(path)?)?;
        self.install(
            SecretString::from(saved.token),
            saved.user.unwrap_or_default(),
        );
        debug!(path = %path.display(), "session restored");
        Ok(true)
    }

    pub fn forget(path: &Path) -> Result<(), AuthError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Truncate or create `path` readable by the owner only. The mode is fixed
/// before any byte of the token is written.
fn open_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        let file = options.open(path)?;
        // An existing file keeps its old mode on open.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        Ok(file)
    }

    #[cfg(not(unix))]
    options.open(path)
}
