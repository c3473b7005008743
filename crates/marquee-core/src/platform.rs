//! Device class detection from the user-agent string

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Mobile markers: Apple handhelds, Android, webOS/Palm, Google TV,
/// Silk, Windows Phone and BlackBerry
static MOBILE_AGENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)iphone|ipad|ipod|android|webos|palm|googletv|silk|windows phone|trident.*wp[1-9]|blackberry|bb10")
        .expect("Invalid mobile agent pattern")
});

/// Reported platform class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Mobile,
    Pc,
}

impl Platform {
    /// Classify a user-agent string
    pub fn detect(user_agent: &str) -> Self {
        if MOBILE_AGENT_PATTERN.is_match(user_agent) {
            Platform::Mobile
        } else {
            Platform::Pc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Mobile => "Mobile",
            Platform::Pc => "PC",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
