//! Access log event generation
//! Produces randomized URL/status draws and the line-oriented wire format

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

/// Every simulated request is a GET
pub const METHOD: &str = "GET";

/// Fixed response time field, in milliseconds
pub const RESPONSE_TIME_MS: u32 = 500;

const AD_URLS: [&str; 3] = [
    "sia.org/ads/1/123/clickfw",
    "sia.org/ads/2/234/clickfw",
    "sia.org/ads/3/56/clickfw",
];

/// HTTP status of a simulated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    NotFound,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }
}

/// One simulated access log record, serialized to a single line and dropped after publish
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub client_addr: String,
    pub session_id: String,
    pub url: &'static str,
    pub status: StatusCode,
}

impl LogEvent {
    /// Generate a fresh event for one user action, drawing URL and status
    /// from the caller's private random source
    pub fn generate<R: Rng>(rng: &mut R, client_addr: &str, session_id: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            client_addr: client_addr.to_string(),
            session_id: session_id.to_string(),
            url: next_url(rng),
            status: next_status(rng),
        }
    }
}

impl fmt::Display for LogEvent {
    /// Wire format consumed by downstream log parsers:
    /// `date time address sessionId URL method responseCode responseTime`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.client_addr,
            self.session_id,
            self.url,
            METHOD,
            self.status.code(),
            RESPONSE_TIME_MS
        )
    }
}

/// Select the next URL. Thresholds give each ad category 10% of draws
/// and the root path the remaining 70%.
pub fn next_url<R: Rng>(rng: &mut R) -> &'static str {
    let draw = rng.gen::<f64>();
    if draw > 0.9 {
        AD_URLS[0]
    } else if draw > 0.8 {
        AD_URLS[1]
    } else if draw > 0.7 {
        AD_URLS[2]
    } else {
        "/"
    }
}

/// Select the response status: 404 for 2% of all events
pub fn next_status<R: Rng>(rng: &mut R) -> StatusCode {
    if rng.gen::<f64>() > 0.98 {
        StatusCode::NotFound
    } else {
        StatusCode::Ok
    }
}
