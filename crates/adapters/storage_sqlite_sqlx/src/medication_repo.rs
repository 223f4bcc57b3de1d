//! `SQLite` implementation of [`MedicationRepository`].

use std::future::Future;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use medfleet_app::ports::MedicationRepository;
use medfleet_domain::error::MedfleetError;
use medfleet_domain::medication::Medication;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Medication`].
pub(crate) struct Wrapper(pub(crate) Medication);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Medication> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let code: String = row.try_get("code")?;
        let name: String = row.try_get("name")?;
        let weight: f64 = row.try_get("weight")?;
        let image: Option<Vec<u8>> = row.try_get("image")?;

        Ok(Self(Medication {
            code,
            name,
            weight,
            image,
        }))
    }
}

const SELECT_BY_CODE: &str = "SELECT * FROM medications WHERE code = ?";

/// `SQLite`-backed medication catalog.
///
/// The catalog is reference data seeded by migration; this repository
/// only reads.
pub struct SqliteMedicationRepository {
    pool: SqlitePool,
}

impl SqliteMedicationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MedicationRepository for SqliteMedicationRepository {
    fn find_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<Medication>, MedfleetError>> + Send {
        let pool = self.pool.clone();
        let code = code.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_CODE)
                .bind(code)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }
}
