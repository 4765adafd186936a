use crate::config::model::{Config, DebugConfig, MailConfig, Secret, TicketmasterConfig};
use crate::ticketmaster::model::SearchQuery;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com";
const DEFAULT_ARTIST_NAME: &str = "Shania Twain";
const DEFAULT_COUNTRY_CODE: &str = "GB";
const DEFAULT_EVENT_LIMIT: u32 = 10;
const DEFAULT_SMTP_SERVER: &str = "smtp.mailgun.org";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_EVENTS_FILE: &str = "events.json";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 24 * 60 * 60;

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| env::var(name).ok())
}

/// Same as [`load_config`], reading values through `lookup` instead of the process environment
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let keyword = load_string_config(&lookup, "ARTIST_NAME", DEFAULT_ARTIST_NAME);

    if keyword.trim().is_empty() {
        return Err(ConfigError::Invalid {
            name: "ARTIST_NAME".to_string(),
            expected: "a non-empty artist name",
        });
    }

    let size: u32 = load_parsed_config(&lookup, "EVENT_LIMIT", DEFAULT_EVENT_LIMIT)?;

    if size == 0 {
        return Err(ConfigError::Invalid {
            name: "EVENT_LIMIT".to_string(),
            expected: "a positive integer",
        });
    }

    let country_code = load_string_config(&lookup, "COUNTRY_CODE", DEFAULT_COUNTRY_CODE);

    if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Invalid {
            name: "COUNTRY_CODE".to_string(),
            expected: "a two letter country code",
        });
    }

    let poll_interval_secs: u64 =
        load_parsed_config(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

    if poll_interval_secs == 0 {
        return Err(ConfigError::Invalid {
            name: "POLL_INTERVAL_SECS".to_string(),
            expected: "a positive number of seconds",
        });
    }

    Ok(Config {
        debug_config: DebugConfig {
            skip_sending: load_parsed_config(&lookup, "DEBUG_SKIP_SENDING", false)?,
            run_once: load_parsed_config(&lookup, "DEBUG_RUN_ONCE", false)?,
        },
        ticketmaster: TicketmasterConfig {
            base_url: load_string_config(&lookup, "TICKETMASTER_BASE_URL", DEFAULT_BASE_URL),
            api_key: Secret::new(load_required_config(&lookup, "TICKETMASTER_API_KEY")?),
            query: SearchQuery {
                keyword,
                size,
                country_code: country_code.to_ascii_uppercase(),
            },
        },
        mail: MailConfig {
            smtp_server: load_string_config(&lookup, "SMTP_SERVER", DEFAULT_SMTP_SERVER),
            smtp_port: load_parsed_config(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            username: load_required_config(&lookup, "MAILGUN_USERNAME")?,
            password: Secret::new(load_required_config(&lookup, "MAILGUN_PASSWORD")?),
            sender: load_required_config(&lookup, "SENDER_EMAIL")?,
            recipient: load_required_config(&lookup, "RECIPIENT_EMAIL")?,
        },
        events_file: PathBuf::from(load_string_config(
            &lookup,
            "EVENTS_FILE",
            DEFAULT_EVENTS_FILE,
        )),
        poll_interval: Duration::from_secs(poll_interval_secs),
    })
}

fn load_required_config<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::Missing(name.to_string()))
}

fn load_string_config<F>(lookup: &F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).unwrap_or_else(|| default.to_string())
}

fn load_parsed_config<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
        }),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set.")]
    Missing(String),
    #[error("Invalid config '{name}'. Expected {expected}.")]
    Invalid { name: String, expected: &'static str },
}
