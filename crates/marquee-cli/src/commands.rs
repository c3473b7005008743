//! CLI command implementations

use marquee_core::{
    Error, FacadeConfig, FrameLocation, MetadataFacade, Notification, NotificationBus,
    ProfileSetting, TokenTable,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::output::{to_json, OutputFormat};

/// Command-line overrides applied on top of the config file
#[derive(Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub query: Option<String>,
    pub user_agent: Option<String>,
    pub player_url: Option<String>,
    pub referrer: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut FacadeConfig) {
        if let Some(profile) = self.profile {
            config.profile = parse_profile(&profile);
        }
        if let Some(query) = self.query {
            config.query = query;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(href) = self.player_url {
            config.location = FrameLocation::TopLevel(href);
        }
        if let Some(referrer) = self.referrer {
            config.location = FrameLocation::Embedded { referrer };
        }
    }
}

/// Resolved template for JSON output
#[derive(Debug, Serialize)]
struct Resolution<'a> {
    template: &'a str,
    ready: bool,
    resolved: String,
}

/// Token listing for JSON output
#[derive(Debug, Serialize)]
struct TokenListing {
    name: &'static str,
    literal: &'static str,
}

/// Resolve templates after replaying notifications
pub fn resolve(
    templates: &[String],
    config: Option<PathBuf>,
    events: Option<PathBuf>,
    overrides: Overrides,
    format: &str,
) -> anyhow::Result<()> {
    let mut config = match config {
        Some(path) => FacadeConfig::from_file(&path)?,
        None => FacadeConfig::default(),
    };
    overrides.apply(&mut config);

    let bus = NotificationBus::new();
    let mut facade = MetadataFacade::from_config(&bus, &config)?;

    if let Some(path) = events {
        let json = std::fs::read_to_string(&path)?;
        let notifications = Notification::list_from_json(&json)?;
        debug!(count = notifications.len(), path = %path.display(), "Replaying notifications");
        for notification in notifications {
            bus.publish(notification);
        }
    }

    let mut results = Vec::with_capacity(templates.len());
    for template in templates {
        let result = match facade.try_resolve(template) {
            Ok(resolved) => Resolution {
                template,
                ready: true,
                resolved,
            },
            Err(Error::NotReady) => {
                warn!("No content metadata received; template resolves to an empty string");
                Resolution {
                    template,
                    ready: false,
                    resolved: String::new(),
                }
            }
            Err(e) => return Err(e.into()),
        };
        results.push(result);
    }

    match OutputFormat::from(format) {
        OutputFormat::Json => println!("{}", to_json(&results)),
        OutputFormat::Text => {
            for result in &results {
                println!("{}", result.resolved);
            }
        }
    }

    Ok(())
}

/// List the tokens of a profile
pub fn tokens(profile: &str, format: &str) -> anyhow::Result<()> {
    let profile = parse_profile(profile).to_profile()?;
    let table = TokenTable::new(&profile);

    match OutputFormat::from(format) {
        OutputFormat::Json => {
            let listing: Vec<_> = table
                .tokens()
                .map(|token| TokenListing {
                    name: token.name(),
                    literal: token.literal(),
                })
                .collect();
            println!("{}", to_json(&listing));
        }
        OutputFormat::Text => {
            println!("Active tokens ({}):", table.len());
            for token in table.tokens() {
                println!("  {}", token.literal());
            }
        }
    }

    Ok(())
}

/// `full`, `reduced`, or a comma-separated token list
fn parse_profile(value: &str) -> ProfileSetting {
    match value.trim().to_lowercase().as_str() {
        "full" => ProfileSetting::Full,
        "reduced" => ProfileSetting::Reduced,
        _ => ProfileSetting::Custom(
            value
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        ),
    }
}
