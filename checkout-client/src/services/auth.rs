//! Student and admin sign-in.

use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use validator::{Validate, ValidationError};

use crate::config::AdminAccount;
use crate::error::AuthError;
use crate::models::{AdminProfile, Identity};
use crate::services::directory::SchoolDirectory;
use crate::services::session::SessionRepository;

#[derive(Debug, Deserialize, Validate)]
pub struct StudentLogin {
    #[validate(custom(function = "validate_nisn"))]
    pub nisn: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminLogin {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// NISN is exactly ten ASCII digits.
fn validate_nisn(nisn: &str) -> Result<(), ValidationError> {
    if nisn.len() == 10 && nisn.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("nisn");
        err.message = Some("NISN must be exactly 10 digits".into());
        Err(err)
    }
}

pub struct Authenticator {
    directory: Arc<dyn SchoolDirectory>,
    sessions: Arc<dyn SessionRepository>,
    admin: AdminAccount,
}

impl Authenticator {
    pub fn new(
        directory: Arc<dyn SchoolDirectory>,
        sessions: Arc<dyn SessionRepository>,
        admin: AdminAccount,
    ) -> Self {
        Self {
            directory,
            sessions,
            admin,
        }
    }

    pub async fn login_student(&self, login: StudentLogin) -> Result<Identity, AuthError> {
        login.validate()?;

        let student = self
            .directory
            .student_by_nisn(&login.nisn)
            .await?
            .ok_or_else(|| {
                tracing::info!("Student login rejected: unknown NISN");
                AuthError::InvalidCredentials
            })?;

        tracing::info!(student_id = %student.id, "Student signed in");
        let identity = Identity::Student { student };
        self.sessions.set(identity.clone());
        Ok(identity)
    }

    pub fn login_admin(&self, login: AdminLogin) -> Result<Identity, AuthError> {
        login.validate()?;

        let username_ok = login
            .username
            .as_bytes()
            .ct_eq(self.admin.username.as_bytes());
        let password_ok = login
            .password
            .as_bytes()
            .ct_eq(self.admin.password.expose_secret().as_bytes());

        if !bool::from(username_ok & password_ok) {
            tracing::warn!("Admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %self.admin.username, "Admin signed in");
        let identity = Identity::Admin {
            admin: AdminProfile {
                username: self.admin.username.clone(),
                name: self.admin.name.clone(),
            },
        };
        self.sessions.set(identity.clone());
        Ok(identity)
    }

    pub fn logout(&self) {
        self.sessions.clear();
    }

    pub fn current(&self) -> Option<Identity> {
        self.sessions.current()
    }
}
