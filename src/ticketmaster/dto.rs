use super::model::EventRecord;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,
}

impl SearchResponse {
    pub fn into_events(self) -> Option<Vec<EventResponse>> {
        self.embedded.map(|embedded| embedded.events)
    }
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<EventResponse>,
}

// Note: everything is optional here, incomplete events get skipped when converting
#[derive(Debug, Deserialize)]
pub struct EventResponse {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub dates: Option<ResponseDates>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedVenues>,
}

impl EventResponse {
    /// Returns `None` (and warns) when a field needed for the notification is missing
    #[tracing::instrument(skip(self), fields(event.id = self.id.as_deref().unwrap_or_default()))]
    pub fn to_model(&self) -> Option<EventRecord> {
        let Some(id) = self.id.clone() else {
            warn!("Event has no id (skipping)");
            return None;
        };
        let Some(name) = self.name.clone() else {
            warn!("Event has no name (skipping)");
            return None;
        };
        let Some(url) = self.url.clone() else {
            warn!("Event has no ticket url (skipping)");
            return None;
        };
        let Some(venue) = self.first_venue_name() else {
            warn!("No venue name found (skipping)");
            return None;
        };
        let Some(date) = self.start_date() else {
            warn!("No valid start date found (skipping)");
            return None;
        };

        Some(EventRecord::new(id, name, venue, date, url))
    }

    fn first_venue_name(&self) -> Option<String> {
        self.embedded
            .as_ref()?
            .venues
            .first()?
            .name
            .clone()
            .filter(|name| !name.is_empty())
    }

    fn start_date(&self) -> Option<NaiveDate> {
        let local_date = self.dates.as_ref()?.start.as_ref()?.local_date.as_ref()?;

        NaiveDate::parse_from_str(local_date, LOCAL_DATE_FORMAT)
            .inspect_err(|err| warn!("Failed to parse date '{local_date}'. Err: {err}"))
            .ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct ResponseDates {
    pub start: Option<ResponseStart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseStart {
    #[serde(rename = "localDate")]
    pub local_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedVenues {
    #[serde(default)]
    pub venues: Vec<ResponseVenue>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseVenue {
    pub name: Option<String>,
}
