//! Ambient execution context: wall clock, user agent and frame location
//!
//! Resolvers never read the host directly. Everything goes through an
//! [`Environment`] so tests can pin the time and the user agent.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the player is running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameLocation {
    /// Top-level browsing context with its own address
    TopLevel(String),
    /// Embedded frame; only the embedding document's address is known
    Embedded { referrer: String },
}

impl FrameLocation {
    /// Address reported as the player URL
    pub fn player_url(&self) -> &str {
        match self {
            FrameLocation::TopLevel(href) => href,
            FrameLocation::Embedded { referrer } => referrer,
        }
    }

    pub fn is_top_level(&self) -> bool {
        matches!(self, FrameLocation::TopLevel(_))
    }
}

impl Default for FrameLocation {
    fn default() -> Self {
        FrameLocation::TopLevel(String::new())
    }
}

/// Capability for reading ambient values
pub trait Environment {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;

    /// User-agent string of the host
    fn user_agent(&self) -> &str;

    /// Frame location of the player
    fn location(&self) -> &FrameLocation;

    /// Convert an absolute instant to local wall-clock time
    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&Local).naive_local()
    }
}

/// Environment backed by the system clock and local time zone
#[derive(Debug, Clone, Default)]
pub struct SystemEnvironment {
    user_agent: String,
    location: FrameLocation,
}

impl SystemEnvironment {
    pub fn new(user_agent: impl Into<String>, location: FrameLocation) -> Self {
        Self {
            user_agent: user_agent.into(),
            location,
        }
    }
}

impl Environment for SystemEnvironment {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn location(&self) -> &FrameLocation {
        &self.location
    }
}

/// Environment pinned to a fixed instant and UTC offset
#[derive(Debug, Clone)]
pub struct FixedEnvironment {
    now: DateTime<FixedOffset>,
    user_agent: String,
    location: FrameLocation,
}

impl FixedEnvironment {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now,
            user_agent: String::new(),
            location: FrameLocation::default(),
        }
    }

    /// Parse the instant from an RFC 3339 string
    pub fn at(rfc3339: &str) -> crate::Result<Self> {
        let now = DateTime::parse_from_rfc3339(rfc3339)
            .map_err(|e| crate::Error::config(format!("invalid instant '{}': {}", rfc3339, e)))?;
        Ok(Self::new(now))
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_location(mut self, location: FrameLocation) -> Self {
        self.location = location;
        self
    }
}

impl Environment for FixedEnvironment {
    fn now(&self) -> NaiveDateTime {
        self.now.naive_local()
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn location(&self) -> &FrameLocation {
        &self.location
    }

    fn to_local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(self.now.offset()).naive_local()
    }
}
