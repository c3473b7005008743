//! Marquee Core - Custom-data token resolution for player analytics
//!
//! This crate turns analytics templates such as `"[SHOW_NAME]|[DAY_PART]"`
//! into concrete strings using the player's current state:
//! - Content metadata snapshots pushed by the host
//! - Page context (provider id) and full-screen state
//! - Autoplay flags captured from the page query string
//! - Wall clock, user agent and frame location via an injectable environment
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Marquee Core                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   host dispatcher ──► ┌──────────────┐                          │
//! │                       │ Notification │                          │
//! │                       │     Bus      │                          │
//! │                       └──────┬───────┘                          │
//! │                              │ drain on read                    │
//! │                       ┌──────┴───────┐                          │
//! │                       │   Metadata   │                          │
//! │                       │    Facade    │                          │
//! │                       └──────┬───────┘                          │
//! │              ┌───────────────┼───────────────┐                  │
//! │       ┌──────┴──────┐ ┌──────┴──────┐ ┌──────┴──────┐           │
//! │       │   Content   │ │   Runtime   │ │ Environment │           │
//! │       │    State    │ │   Context   │ │ (clock, UA) │           │
//! │       └──────┬──────┘ └──────┬──────┘ └──────┬──────┘           │
//! │              └───────────────┼───────────────┘                  │
//! │                       ┌──────┴───────┐  ┌──────────────┐        │
//! │                       │   Template   │──│    Token     │        │
//! │                       │    Engine    │  │    Table     │        │
//! │                       └──────────────┘  └──────────────┘        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use marquee_core::{
//!     ContentMetadataSnapshot, FixedEnvironment, MetadataFacade, Notification,
//!     NotificationBus, QueryFlags, TokenProfile,
//! };
//!
//! let bus = NotificationBus::default();
//! let env = FixedEnvironment::at("2024-03-06T09:05:00-05:00").unwrap();
//! let mut facade = MetadataFacade::new(
//!     &bus,
//!     TokenProfile::Full,
//!     QueryFlags::parse("?autoplay=true"),
//!     env,
//! );
//!
//! bus.publish(Notification::MetadataUpdated(ContentMetadataSnapshot::new("Nightly")));
//! assert_eq!(facade.resolve("[SHOW_NAME] @ [FORMATTED_MINUTES]"), "Nightly @ 09:05");
//! ```

pub mod error;
pub mod types;
pub mod state;
pub mod environment;
pub mod platform;
pub mod tokens;
pub mod template;
pub mod bus;
pub mod config;
pub mod facade;

pub use error::{Error, Result};
pub use types::*;
pub use state::{ContentState, QueryFlags, RuntimeContext};
pub use environment::{Environment, FixedEnvironment, FrameLocation, SystemEnvironment};
pub use platform::Platform;
pub use tokens::{Resolver, Scope, Token, TokenProfile, TokenTable};
pub use template::TemplateEngine;
pub use bus::{NotificationBus, Subscription};
pub use config::{FacadeConfig, ProfileSetting};
pub use facade::MetadataFacade;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "Marquee Core initialized");
}
