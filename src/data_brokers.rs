use crate::data_brokers_db::DATA_BROKERS;
use crate::profile::UserProfile;
use crate::takedown::{TakedownDetails, TakedownTemplate};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::info;

// Probability of each broker showing up in a simulated scan
const SIMULATED_HIT_PROBABILITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize, Display)]
pub enum RemovalDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBroker {
    pub name: String,
    pub description: String,
    pub removal_link: String,
    pub difficulty: RemovalDifficulty,
}

pub fn data_brokers_from_json(json: &str) -> serde_json::Result<Vec<DataBroker>> {
    serde_json::from_str(json)
}

/// Finds data brokers holding the profile's personal information.
pub trait BrokerScanner {
    async fn scan(&self, profile: &UserProfile) -> Result<Vec<DataBroker>>;
}

/// Stand-in scanner that samples the built-in broker catalog at random.
pub struct SimulatedBrokerScanner {
    catalog: Vec<DataBroker>,
    rng: Mutex<StdRng>,
}

impl SimulatedBrokerScanner {
    pub fn new() -> Result<Self> {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Result<Self> {
        let catalog = data_brokers_from_json(DATA_BROKERS)
            .context("Failed to parse built-in data broker catalog")?;
        Ok(Self {
            catalog,
            rng: Mutex::new(rng),
        })
    }

    pub fn catalog(&self) -> &[DataBroker] {
        &self.catalog
    }
}

impl BrokerScanner for SimulatedBrokerScanner {
    async fn scan(&self, _profile: &UserProfile) -> Result<Vec<DataBroker>> {
        let mut rng = self.rng.lock();
        let found: Vec<DataBroker> = self
            .catalog
            .iter()
            .filter(|_| rng.gen_bool(SIMULATED_HIT_PROBABILITY))
            .cloned()
            .collect();
        info!("Data broker scan found {} brokers", found.len());
        Ok(found)
    }
}

/// A ready-to-send removal request for one broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalRequest {
    pub broker: String,
    pub removal_link: String,
    pub difficulty: RemovalDifficulty,
    pub letter: String,
}

pub fn removal_request(
    broker: &DataBroker,
    profile: &UserProfile,
    template: TakedownTemplate,
) -> RemovalRequest {
    let details = TakedownDetails {
        company: Some(broker.name.clone()),
        name: Some(profile.name.clone()),
        email: Some(profile.email.clone()),
        ..Default::default()
    };
    RemovalRequest {
        broker: broker.name.clone(),
        removal_link: broker.removal_link.clone(),
        difficulty: broker.difficulty,
        letter: template.render(&details),
    }
}
