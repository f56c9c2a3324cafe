use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::Path;

use crate::core::models::{TimedFrequency, WorkerShip};
use crate::errors::StarbaseError;

#[derive(Debug, Clone)]
pub struct StarbaseConfig {
    pub template_bucket: String,
    pub template_bucket_region: String,
    pub fanout_queue_url: String,
    pub worker_ships_config: String,
}

impl StarbaseConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            template_bucket: env::var("TEMPLATE_BUCKET")
                .map_err(|e| format!("TEMPLATE_BUCKET: {}", e))?,
            template_bucket_region: env::var("TEMPLATE_BUCKET_REGION")
                .map_err(|e| format!("TEMPLATE_BUCKET_REGION: {}", e))?,
            fanout_queue_url: env::var("FANOUT_QUEUE_URL")
                .map_err(|e| format!("FANOUT_QUEUE_URL: {}", e))?,
            worker_ships_config: env::var("WORKER_SHIPS_CONFIG")
                .map_err(|e| format!("WORKER_SHIPS_CONFIG: {}", e))?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(rename = "WorkerShips")]
    worker_ships: Vec<WorkerShip>,
}

/// The set of worker ships Starbase knows how to task.
#[derive(Debug, Clone, Default)]
pub struct WorkerShipRegistry {
    ships: Vec<WorkerShip>,
}

impl WorkerShipRegistry {
    pub fn new(ships: Vec<WorkerShip>) -> Result<Self, StarbaseError> {
        let mut seen = HashSet::new();
        for ship in &ships {
            if !seen.insert(ship.name.as_str()) {
                return Err(StarbaseError::ConfigError(format!(
                    "duplicate worker ship: {}",
                    ship.name
                )));
            }
        }
        Ok(Self { ships })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, StarbaseError> {
        let file: RegistryFile = serde_yaml::from_str(raw)
            .map_err(|e| StarbaseError::ConfigError(format!("invalid worker ship config: {e}")))?;
        Self::new(file.worker_ships)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StarbaseError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&WorkerShip> {
        self.ships.iter().find(|ship| ship.name == name)
    }

    pub fn scheduled_for(&self, frequency: TimedFrequency) -> impl Iterator<Item = &WorkerShip> {
        self.ships
            .iter()
            .filter(move |ship| ship.frequency == Some(frequency))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}
