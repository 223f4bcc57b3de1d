//! Authentication service — user sign-up, sign-in, token issuance.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use medfleet_domain::error::{AlreadyExistsError, MedfleetError, ValidationError};
use medfleet_domain::user::{AppUser, Role, UserRegistration, MIN_PASSWORD_LENGTH};

use crate::ports::AppUserRepository;
use crate::token::TokenSigner;

/// Application service for account management.
///
/// Issues a bearer token on both sign-up and sign-in; the token is what
/// the HTTP layer requires on every fleet operation. Passwords are
/// stored as salted `blake3` digests and never leave this service in
/// clear text.
pub struct AuthService<UR> {
    users: UR,
    signer: Arc<TokenSigner>,
}

impl<UR: AppUserRepository> AuthService<UR> {
    /// Create a new service backed by the given user store and signer.
    pub fn new(users: UR, signer: Arc<TokenSigner>) -> Self {
        Self { users, signer }
    }

    /// Register a new account and issue its first bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::Validation`] if a field invariant fails,
    /// [`MedfleetError::AlreadyExists`] if the email is taken, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn sign_up(&self, registration: UserRegistration) -> Result<String, MedfleetError> {
        if registration.password.len() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort.into());
        }

        let user = AppUser {
            id: Uuid::new_v4(),
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            password_hash: hash_password(&registration.password),
            role: Role::User,
            created_at: Utc::now(),
        };
        user.validate()?;

        if self.users.find_by_email(&user.email).await?.is_some() {
            return Err(AlreadyExistsError::User { email: user.email }.into());
        }

        let user = self.users.save(user).await?;
        self.signer.issue(&user)
    }

    /// Authenticate an existing account and issue a fresh bearer token.
    ///
    /// An unknown email and a wrong password are indistinguishable to
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns [`MedfleetError::InvalidCredentials`] when the pair does
    /// not match an account, or a storage error from the repository.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, MedfleetError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(MedfleetError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(MedfleetError::InvalidCredentials);
        }

        self.signer.issue(&user)
    }
}

/// Digest a password with a fresh random salt, `salt$hex` on the wire.
fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = blake3::hash(format!("{salt}{password}").as_bytes());
    format!("{salt}${}", digest.to_hex())
}

/// Check a password against a stored `salt$hex` digest.
fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    // Hash equality is constant-time.
    match blake3::Hash::from_hex(digest) {
        Ok(expected) => blake3::hash(format!("{salt}{password}").as_bytes()) == expected,
        Err(_) => false,
    }
}
