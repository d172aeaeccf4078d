use crate::advisor::{recommend_actions, RecommendedAction};
use crate::breach::{breaches_from_json, BreachRecord};
use crate::breaches_db::BREACHES;
use crate::risk::{assess_risk, RiskAssessment};
use anyhow::{Context, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, warn};

// Probability of each catalog entry showing up in a simulated lookup
const SIMULATED_HIT_PROBABILITY: f64 = 0.6;
const SIMULATED_MAX_RESULTS: usize = 5;

/// Where breach records for an identity come from.
pub trait BreachSource {
    async fn lookup(&self, query: &str) -> Result<Vec<BreachRecord>>;
}

/// Stand-in source that samples the built-in catalog at random.
pub struct SimulatedBreachSource {
    catalog: Vec<BreachRecord>,
    rng: Mutex<StdRng>,
}

impl SimulatedBreachSource {
    pub fn new() -> Result<Self> {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Result<Self> {
        let catalog =
            breaches_from_json(BREACHES).context("Failed to parse built-in breach catalog")?;
        Ok(Self {
            catalog,
            rng: Mutex::new(rng),
        })
    }

    pub fn catalog(&self) -> &[BreachRecord] {
        &self.catalog
    }
}

impl BreachSource for SimulatedBreachSource {
    async fn lookup(&self, _query: &str) -> Result<Vec<BreachRecord>> {
        let mut rng = self.rng.lock();
        let mut found: Vec<BreachRecord> = self
            .catalog
            .iter()
            .filter(|_| rng.gen_bool(SIMULATED_HIT_PROBABILITY))
            .cloned()
            .collect();
        found.truncate(rng.gen_range(1..=SIMULATED_MAX_RESULTS));
        Ok(found)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanStatus {
    Completed,
    // The source failed, breaches are empty and the risk is not meaningful
    SourceUnavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub query: String,
    pub breaches: Vec<BreachRecord>,
    pub risk: RiskAssessment,
    pub actions: Vec<RecommendedAction>,
    pub status: ScanStatus,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScanError {
    #[error("the query is empty")]
    EmptyQuery,
}

/// Look up an identifier and build the full report.
///
/// A failing source does not fail the scan: the report comes back empty with `SourceUnavailable`.
pub async fn scan_for_breaches<S: BreachSource>(
    source: &S,
    query: &str,
) -> Result<ScanReport, ScanError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ScanError::EmptyQuery);
    }

    let (breaches, status) = match source.lookup(query).await {
        Ok(breaches) => (breaches, ScanStatus::Completed),
        Err(e) => {
            warn!("Breach lookup failed: {:?}", e);
            (Vec::new(), ScanStatus::SourceUnavailable)
        }
    };

    let risk = assess_risk(&breaches);
    let actions = recommend_actions(&breaches);
    info!(
        "Scan completed with {} breaches, risk {} ({})",
        breaches.len(),
        risk.level(),
        risk.score()
    );

    Ok(ScanReport {
        query: query.to_string(),
        breaches,
        risk,
        actions,
        status,
    })
}
