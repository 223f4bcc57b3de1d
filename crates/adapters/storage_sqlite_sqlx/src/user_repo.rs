//! `SQLite` implementation of [`AppUserRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};
use uuid::Uuid;

use medfleet_app::ports::AppUserRepository;
use medfleet_domain::error::MedfleetError;
use medfleet_domain::user::{AppUser, Role};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`AppUser`].
struct Wrapper(AppUser);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<AppUser> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let first_name: String = row.try_get("first_name")?;
        let last_name: String = row.try_get("last_name")?;
        let email: String = row.try_get("email")?;
        let password_hash: String = row.try_get("password_hash")?;
        let role: String = row.try_get("role")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        let id = Uuid::parse_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let role = Role::from_str(&role).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(AppUser {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            role,
            created_at,
        }))
    }
}

const UPSERT: &str = "INSERT INTO app_users (id, first_name, last_name, email, password_hash, role, created_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?) \
     ON CONFLICT (id) DO UPDATE SET first_name = excluded.first_name, \
     last_name = excluded.last_name, email = excluded.email, \
     password_hash = excluded.password_hash, role = excluded.role";
const SELECT_BY_EMAIL: &str = "SELECT * FROM app_users WHERE email = ?";

/// `SQLite`-backed user account repository.
pub struct SqliteAppUserRepository {
    pool: SqlitePool,
}

impl SqliteAppUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AppUserRepository for SqliteAppUserRepository {
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AppUser>, MedfleetError>> + Send {
        let pool = self.pool.clone();
        let email = email.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn save(&self, user: AppUser) -> impl Future<Output = Result<AppUser, MedfleetError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(user.id.to_string())
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.role.as_str())
                .bind(user.created_at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(user)
        }
    }
}
