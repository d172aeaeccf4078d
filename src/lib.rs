pub mod advisor;
pub mod breach;
pub mod breach_source;
pub mod breaches_db;
pub mod chat;
pub mod config;
pub mod data_brokers;
pub mod data_brokers_db;
pub mod exposure;
pub mod logger;
pub mod profile;
pub mod pwned_password;
pub mod risk;
pub mod takedown;

pub static FOUNDATION_VERSION: &str = env!("CARGO_PKG_VERSION");

// User agent sent to the remote services we query
pub fn user_agent() -> String {
    format!("privacyguard-foundation/{}", FOUNDATION_VERSION)
}
