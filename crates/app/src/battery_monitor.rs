//! Periodic battery audit — logs every drone's battery level.
//!
//! The fleet has no real telemetry feed, so the audit is the one place
//! battery levels surface in the logs. Run it as a background task from
//! the composition root.

use std::time::Duration;

use medfleet_domain::drone::MIN_LOADING_BATTERY;
use medfleet_domain::error::MedfleetError;

use crate::ports::DroneRepository;

/// Background task reading every drone and logging its battery level.
pub struct BatteryMonitor<DR> {
    drones: DR,
    period: Duration,
}

impl<DR: DroneRepository> BatteryMonitor<DR> {
    /// Create a monitor that audits the fleet every `period`.
    pub fn new(drones: DR, period: Duration) -> Self {
        Self { drones, period }
    }

    /// Run the audit loop until the task is dropped.
    ///
    /// Storage failures are logged and the loop keeps ticking.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = self.audit().await {
                tracing::warn!(error = %err, "battery audit failed");
            }
        }
    }

    /// Audit the fleet once, returning how many drones were checked.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn audit(&self) -> Result<usize, MedfleetError> {
        let drones = self.drones.find_all().await?;
        for drone in &drones {
            if drone.battery_capacity < MIN_LOADING_BATTERY {
                tracing::warn!(
                    serial_number = %drone.serial_number,
                    battery = drone.battery_capacity,
                    "drone below loading battery floor"
                );
            } else {
                tracing::info!(
                    serial_number = %drone.serial_number,
                    battery = drone.battery_capacity,
                    "drone battery level"
                );
            }
        }
        Ok(drones.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use medfleet_domain::drone::{Drone, DroneModel, DroneRegistration, DroneState};

    #[derive(Clone, Default)]
    struct InMemoryDroneRepo {
        store: Arc<Mutex<HashMap<String, Drone>>>,
        reads: Arc<AtomicUsize>,
    }

    impl InMemoryDroneRepo {
        fn with_drones(serial_numbers: &[&str]) -> Self {
            let repo = Self::default();
            {
                let mut store = repo.store.lock().unwrap();
                for serial_number in serial_numbers {
                    store.insert(
                        (*serial_number).to_string(),
                        Drone::from(DroneRegistration {
                            serial_number: (*serial_number).to_string(),
                            model: DroneModel::Lightweight,
                            weight_limit: 200.0,
                            battery_capacity: 40,
                        }),
                    );
                }
            }
            repo
        }
    }

    impl DroneRepository for InMemoryDroneRepo {
        fn find_by_serial_number(
            &self,
            serial_number: &str,
        ) -> impl Future<Output = Result<Option<Drone>, MedfleetError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(serial_number).cloned();
            async { Ok(result) }
        }

        fn save(&self, drone: Drone) -> impl Future<Output = Result<Drone, MedfleetError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(drone.serial_number.clone(), drone.clone());
            async { Ok(drone) }
        }

        fn find_all_by_state(
            &self,
            state: DroneState,
        ) -> impl Future<Output = Result<Vec<Drone>, MedfleetError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Drone> =
                store.values().filter(|d| d.state == state).cloned().collect();
            async { Ok(result) }
        }

        fn find_all(&self) -> impl Future<Output = Result<Vec<Drone>, MedfleetError>> + Send {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let store = self.store.lock().unwrap();
            let result: Vec<Drone> = store.values().cloned().collect();
            async { Ok(result) }
        }
    }

    #[tokio::test]
    async fn should_count_every_drone_in_one_audit() {
        let repo = InMemoryDroneRepo::with_drones(&["DRN-001", "DRN-002", "DRN-003"]);
        let monitor = BatteryMonitor::new(repo, Duration::from_secs(5));

        assert_eq!(monitor.audit().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn should_audit_empty_fleet_without_error() {
        let monitor = BatteryMonitor::new(InMemoryDroneRepo::default(), Duration::from_secs(5));
        assert_eq!(monitor.audit().await.unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_auditing_on_each_tick() {
        let repo = InMemoryDroneRepo::with_drones(&["DRN-001"]);
        let reads = Arc::clone(&repo.reads);
        let monitor = BatteryMonitor::new(repo, Duration::from_secs(5));

        let task = tokio::spawn(monitor.run());
        tokio::time::sleep(Duration::from_secs(16)).await;
        task.abort();

        // first tick fires immediately, then one every five seconds
        assert!(reads.load(Ordering::SeqCst) >= 3);
    }
}
