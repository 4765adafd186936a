use super::{dto::SearchResponse, model::EventRecord, model::SearchQuery};
use crate::config::model::{Secret, TicketmasterConfig};
use crate::watcher::EventSource;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

const EVENTS_PATH: &str = "/discovery/v2/events.json";

pub struct TicketmasterAPI {
    client: Client,
    events_url: String,
    api_key: Secret,
    query: SearchQuery,
}

impl TicketmasterAPI {
    pub fn new(config: &TicketmasterConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &TicketmasterConfig) -> Self {
        Self {
            client,
            events_url: format!("{}{}", config.base_url.trim_end_matches('/'), EVENTS_PATH),
            api_key: config.api_key.clone(),
            query: config.query.clone(),
        }
    }

    /**
    Returns the events in the order the API ranked them.
    Events missing a venue, date, id or url are left out.
    */
    #[tracing::instrument(skip(self), fields(keyword = %self.query.keyword, country = %self.query.country_code))]
    pub async fn get_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        info!("Getting up to {} events", self.query.size);

        let size = self.query.size.to_string();

        let json_response = self
            .client
            .get(&self.events_url)
            .query(&[
                ("apikey", self.api_key.expose()),
                ("keyword", self.query.keyword.as_str()),
                ("size", size.as_str()),
                ("countryCode", self.query.country_code.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?
            .error_for_status()
            .map_err(|err| match err.status() {
                Some(status) => FetchError::Status(status),
                None => FetchError::Transport(err),
            })?
            .text()
            .await
            .map_err(FetchError::Transport)?;

        let parsed_response = serde_json::from_str::<SearchResponse>(&json_response);

        match parsed_response {
            Ok(parsed_response) => match parsed_response.into_events() {
                Some(events) => Ok(events.iter().filter_map(|e| e.to_model()).collect()),
                None => {
                    info!("No events found in response data");
                    Ok(Vec::new())
                }
            },
            Err(e) => {
                error!("Response parse failed: {:?}", e);
                Err(FetchError::InvalidResponse(e))
            }
        }
    }
}

#[async_trait]
impl EventSource for TicketmasterAPI {
    async fn fetch_events(&self) -> Result<Vec<EventRecord>, FetchError> {
        self.get_events().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("API answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("received invalid response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}
