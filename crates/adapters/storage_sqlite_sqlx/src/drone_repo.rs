//! `SQLite` implementation of [`DroneRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use medfleet_app::ports::DroneRepository;
use medfleet_domain::drone::{Drone, DroneModel, DroneState};
use medfleet_domain::error::MedfleetError;
use medfleet_domain::medication::Medication;

use crate::error::StorageError;
use crate::medication_repo::Wrapper as MedicationWrapper;

/// Wrapper for converting database rows into domain [`Drone`].
///
/// The load list lives in its own table; rows decode with an empty hold
/// and the repository attaches the items afterwards.
struct Wrapper(Drone);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Drone> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let serial_number: String = row.try_get("serial_number")?;
        let model: String = row.try_get("model")?;
        let weight_limit: f64 = row.try_get("weight_limit")?;
        let battery_capacity: i64 = row.try_get("battery_capacity")?;
        let state: String = row.try_get("state")?;

        let model =
            DroneModel::from_str(&model).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let state =
            DroneState::from_str(&state).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let battery_capacity = u8::try_from(battery_capacity)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(Drone {
            serial_number,
            model,
            weight_limit,
            battery_capacity,
            state,
            loaded_items: Vec::new(),
        }))
    }
}

const UPSERT: &str = "INSERT INTO drones (serial_number, model, weight_limit, battery_capacity, state) \
     VALUES (?, ?, ?, ?, ?) \
     ON CONFLICT (serial_number) DO UPDATE SET model = excluded.model, \
     weight_limit = excluded.weight_limit, battery_capacity = excluded.battery_capacity, \
     state = excluded.state";
const DELETE_LOADS: &str = "DELETE FROM drone_loads WHERE drone_serial_number = ?";
const INSERT_LOAD: &str =
    "INSERT INTO drone_loads (drone_serial_number, medication_code, position) VALUES (?, ?, ?)";
const SELECT_BY_SERIAL: &str = "SELECT * FROM drones WHERE serial_number = ?";
const SELECT_BY_STATE: &str = "SELECT * FROM drones WHERE state = ? ORDER BY serial_number";
const SELECT_ALL: &str = "SELECT * FROM drones ORDER BY serial_number";
const SELECT_LOADS: &str = "SELECT m.code, m.name, m.weight, m.image FROM drone_loads l \
     JOIN medications m ON m.code = l.medication_code \
     WHERE l.drone_serial_number = ? ORDER BY l.position";

/// `SQLite`-backed drone repository.
///
/// `save` replaces the drone row and its load list in one transaction,
/// so a drone is never durable with half a hold.
pub struct SqliteDroneRepository {
    pool: SqlitePool,
}

impl SqliteDroneRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn fetch_loaded_items(
    pool: &SqlitePool,
    serial_number: &str,
) -> Result<Vec<Medication>, StorageError> {
    let rows: Vec<MedicationWrapper> = sqlx::query_as(SELECT_LOADS)
        .bind(serial_number)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|w| w.0).collect())
}

impl DroneRepository for SqliteDroneRepository {
    fn find_by_serial_number(
        &self,
        serial_number: &str,
    ) -> impl Future<Output = Result<Option<Drone>, MedfleetError>> + Send {
        let pool = self.pool.clone();
        let serial_number = serial_number.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_SERIAL)
                .bind(&serial_number)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            let Some(mut drone) = Wrapper::maybe(row) else {
                return Ok(None);
            };
            drone.loaded_items = fetch_loaded_items(&pool, &serial_number).await?;
            Ok(Some(drone))
        }
    }

    fn save(&self, drone: Drone) -> impl Future<Output = Result<Drone, MedfleetError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            sqlx::query(UPSERT)
                .bind(&drone.serial_number)
                .bind(drone.model.to_string())
                .bind(drone.weight_limit)
                .bind(i64::from(drone.battery_capacity))
                .bind(drone.state.to_string())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            sqlx::query(DELETE_LOADS)
                .bind(&drone.serial_number)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            for (position, item) in (0_i64..).zip(&drone.loaded_items) {
                sqlx::query(INSERT_LOAD)
                    .bind(&drone.serial_number)
                    .bind(&item.code)
                    .bind(position)
                    .execute(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
            }

            tx.commit().await.map_err(StorageError::from)?;
            Ok(drone)
        }
    }

    fn find_all_by_state(
        &self,
        state: DroneState,
    ) -> impl Future<Output = Result<Vec<Drone>, MedfleetError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_STATE)
                .bind(state.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut drones = Vec::with_capacity(rows.len());
            for mut drone in rows.into_iter().map(|w| w.0) {
                drone.loaded_items = fetch_loaded_items(&pool, &drone.serial_number).await?;
                drones.push(drone);
            }
            Ok(drones)
        }
    }

    fn find_all(&self) -> impl Future<Output = Result<Vec<Drone>, MedfleetError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            let mut drones = Vec::with_capacity(rows.len());
            for mut drone in rows.into_iter().map(|w| w.0) {
                drone.loaded_items = fetch_loaded_items(&pool, &drone.serial_number).await?;
                drones.push(drone);
            }
            Ok(drones)
        }
    }
}
