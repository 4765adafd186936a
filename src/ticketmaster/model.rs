use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One ticketed event, as kept in the snapshot file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    pub venue: String,
    /// Local date of the event start
    pub date: NaiveDate,
    pub url: String,
}

impl EventRecord {
    pub fn new(id: String, name: String, venue: String, date: NaiveDate, url: String) -> Self {
        Self {
            id,
            name,
            venue,
            date,
            url,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keyword: String,
    pub size: u32,
    pub country_code: String,
}
