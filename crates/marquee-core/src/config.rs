//! Facade configuration
//!
//! Loaded from JSON; every field has a default so `{}` is a valid config.
//!
//! ```json
//! {
//!   "profile": { "custom": ["SHOW_NAME", "GUID"] },
//!   "query": "?autoplay=true",
//!   "user_agent": "Mozilla/5.0 (iPhone)",
//!   "location": { "embedded": { "referrer": "https://partner.example" } }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    environment::{FrameLocation, SystemEnvironment},
    state::QueryFlags,
    tokens::TokenProfile,
    Error, Result,
};

/// Token profile as written in configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSetting {
    #[default]
    Full,
    Reduced,
    Custom(Vec<String>),
}

impl ProfileSetting {
    /// Resolve token names; unknown names are an error
    pub fn to_profile(&self) -> Result<TokenProfile> {
        match self {
            ProfileSetting::Full => Ok(TokenProfile::Full),
            ProfileSetting::Reduced => Ok(TokenProfile::Reduced),
            ProfileSetting::Custom(names) => TokenProfile::custom(names),
        }
    }
}

/// Configuration for [`MetadataFacade::from_config`](crate::MetadataFacade::from_config)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Active token set
    pub profile: ProfileSetting,
    /// Raw page query string
    pub query: String,
    /// Host user agent
    pub user_agent: String,
    /// Player frame location
    pub location: FrameLocation,
}

impl FacadeConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(&self.profile, ProfileSetting::Custom(names) if names.is_empty()) {
            return Err(Error::config("custom profile must name at least one token"));
        }
        self.profile.to_profile()?;
        Ok(())
    }

    pub fn token_profile(&self) -> Result<TokenProfile> {
        self.profile.to_profile()
    }

    pub fn query_flags(&self) -> QueryFlags {
        QueryFlags::parse(&self.query)
    }

    pub fn environment(&self) -> SystemEnvironment {
        SystemEnvironment::new(self.user_agent.clone(), self.location.clone())
    }
}
