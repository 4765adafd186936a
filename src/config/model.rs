use crate::ticketmaster::model::SearchQuery;
use std::fmt::{Debug, Display};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub debug_config: DebugConfig,
    pub ticketmaster: TicketmasterConfig,
    pub mail: MailConfig,
    pub events_file: PathBuf,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    pub skip_sending: bool,
    pub run_once: bool,
}

#[derive(Debug, Clone)]
pub struct TicketmasterConfig {
    pub base_url: String,
    pub api_key: Secret,
    pub query: SearchQuery,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: Secret,
    pub sender: String,
    pub recipient: String,
}

/// Credential that never shows up in logs
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(***)")
    }
}

impl Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}
