//! Token table and resolvers
//!
//! Every token maps to a resolver that reads the current snapshot, the
//! runtime context and the environment, and returns a string. Resolvers
//! never emit bracketed token text of their own, so substitution order
//! cannot change the result.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::{
    environment::Environment,
    platform::Platform,
    state::RuntimeContext,
    types::{ContentMetadataSnapshot, FieldValue},
    Error, Result,
};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Known template tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    ShowName,
    DayPart,
    FormattedMinutes,
    DateGetHours,
    DayOfWeek,
    Month,
    DateGetDate,
    DateGetFullYear,
    Platform,
    Mvpd,
    Initiate,
    PrimaryCategory,
    SecondaryCategory,
    VideoScreen,
    AssetStatus,
    PlayerUrl,
    EpisodeNum,
    Guid,
    AirDate,
    Season,
}

impl Token {
    /// Every token, in table order
    pub const ALL: [Token; 20] = [
        Token::ShowName,
        Token::DayPart,
        Token::FormattedMinutes,
        Token::DateGetHours,
        Token::DayOfWeek,
        Token::Month,
        Token::DateGetDate,
        Token::DateGetFullYear,
        Token::Platform,
        Token::Mvpd,
        Token::Initiate,
        Token::PrimaryCategory,
        Token::SecondaryCategory,
        Token::VideoScreen,
        Token::AssetStatus,
        Token::PlayerUrl,
        Token::EpisodeNum,
        Token::Guid,
        Token::AirDate,
        Token::Season,
    ];

    /// Tokens left out of the reduced profile
    const FULL_ONLY: [Token; 7] = [
        Token::VideoScreen,
        Token::AssetStatus,
        Token::PlayerUrl,
        Token::EpisodeNum,
        Token::Guid,
        Token::AirDate,
        Token::Season,
    ];

    /// Bare token name, e.g. `SHOW_NAME`
    pub fn name(&self) -> &'static str {
        match self {
            Token::ShowName => "SHOW_NAME",
            Token::DayPart => "DAY_PART",
            Token::FormattedMinutes => "FORMATTED_MINUTES",
            Token::DateGetHours => "DATE_GET_HOURS",
            Token::DayOfWeek => "DAY_OF_WEEK",
            Token::Month => "MONTH",
            Token::DateGetDate => "DATE_GET_DATE",
            Token::DateGetFullYear => "DATE_GET_FULL_YEAR",
            Token::Platform => "PLATFORM",
            Token::Mvpd => "MVPD",
            Token::Initiate => "INITIATE",
            Token::PrimaryCategory => "PRIMARY_CATEGORY",
            Token::SecondaryCategory => "SECONDARY_CATEGORY",
            Token::VideoScreen => "VIDEO_SCREEN",
            Token::AssetStatus => "ASSETSTATUS",
            Token::PlayerUrl => "PLAYER_URL",
            Token::EpisodeNum => "EPISODE_NUM",
            Token::Guid => "GUID",
            Token::AirDate => "AIRDATE",
            Token::Season => "SEASON",
        }
    }

    /// Literal as it appears in templates, e.g. `[SHOW_NAME]`
    pub fn literal(&self) -> &'static str {
        match self {
            Token::ShowName => "[SHOW_NAME]",
            Token::DayPart => "[DAY_PART]",
            Token::FormattedMinutes => "[FORMATTED_MINUTES]",
            Token::DateGetHours => "[DATE_GET_HOURS]",
            Token::DayOfWeek => "[DAY_OF_WEEK]",
            Token::Month => "[MONTH]",
            Token::DateGetDate => "[DATE_GET_DATE]",
            Token::DateGetFullYear => "[DATE_GET_FULL_YEAR]",
            Token::Platform => "[PLATFORM]",
            Token::Mvpd => "[MVPD]",
            Token::Initiate => "[INITIATE]",
            Token::PrimaryCategory => "[PRIMARY_CATEGORY]",
            Token::SecondaryCategory => "[SECONDARY_CATEGORY]",
            Token::VideoScreen => "[VIDEO_SCREEN]",
            Token::AssetStatus => "[ASSETSTATUS]",
            Token::PlayerUrl => "[PLAYER_URL]",
            Token::EpisodeNum => "[EPISODE_NUM]",
            Token::Guid => "[GUID]",
            Token::AirDate => "[AIRDATE]",
            Token::Season => "[SEASON]",
        }
    }

    /// Resolver for this token
    pub fn resolver(&self) -> Resolver {
        match self {
            Token::ShowName => show_name,
            Token::DayPart => day_part,
            Token::FormattedMinutes => formatted_minutes,
            Token::DateGetHours => date_get_hours,
            Token::DayOfWeek => day_of_week,
            Token::Month => month,
            Token::DateGetDate => date_get_date,
            Token::DateGetFullYear => date_get_full_year,
            Token::Platform => platform,
            Token::Mvpd => mvpd,
            Token::Initiate => initiate,
            Token::PrimaryCategory => primary_category,
            Token::SecondaryCategory => secondary_category,
            Token::VideoScreen => video_screen,
            Token::AssetStatus => asset_status,
            Token::PlayerUrl => player_url,
            Token::EpisodeNum => episode_num,
            Token::Guid => guid,
            Token::AirDate => air_date,
            Token::Season => season,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

impl FromStr for Token {
    type Err = Error;

    /// Accepts `SHOW_NAME` or `[SHOW_NAME]`
    fn from_str(s: &str) -> Result<Self> {
        let name = s
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(s);

        Token::ALL
            .into_iter()
            .find(|token| token.name() == name)
            .ok_or_else(|| Error::UnknownToken { name: s.to_string() })
    }
}

/// Which tokens a facade recognizes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenProfile {
    /// All tokens
    #[default]
    Full,
    /// Schedule, platform and category tokens only; no full-screen tracking
    Reduced,
    /// An explicit token list
    Custom(Vec<Token>),
}

impl TokenProfile {
    pub fn reduced() -> Self {
        TokenProfile::Reduced
    }

    /// Build a custom profile from token names
    pub fn custom<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Token>>>()?;
        Ok(TokenProfile::Custom(tokens))
    }

    /// Active tokens, without duplicates
    pub fn tokens(&self) -> Vec<Token> {
        match self {
            TokenProfile::Full => Token::ALL.to_vec(),
            TokenProfile::Reduced => Token::ALL
                .into_iter()
                .filter(|token| !Token::FULL_ONLY.contains(token))
                .collect(),
            TokenProfile::Custom(tokens) => {
                let mut unique = Vec::with_capacity(tokens.len());
                for token in tokens {
                    if !unique.contains(token) {
                        unique.push(*token);
                    }
                }
                unique
            }
        }
    }

    /// Whether full-screen notifications matter for this profile
    pub fn tracks_full_screen(&self) -> bool {
        self.tokens().contains(&Token::VideoScreen)
    }
}

/// Inputs visible to resolvers during one resolution pass.
///
/// The wall-clock instant is read once, so every date and time token
/// in a template agrees.
pub struct Scope<'a> {
    pub content: &'a ContentMetadataSnapshot,
    pub runtime: &'a RuntimeContext,
    pub environment: &'a dyn Environment,
    pub now: NaiveDateTime,
}

impl<'a> Scope<'a> {
    pub fn new(
        content: &'a ContentMetadataSnapshot,
        runtime: &'a RuntimeContext,
        environment: &'a dyn Environment,
    ) -> Self {
        Self {
            content,
            runtime,
            environment,
            now: environment.now(),
        }
    }
}

/// Resolver function
pub type Resolver = fn(&Scope<'_>) -> String;

/// Active token set with its resolvers
#[derive(Clone)]
pub struct TokenTable {
    entries: Vec<(Token, Resolver)>,
}

impl fmt::Debug for TokenTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tokens()).finish()
    }
}

impl TokenTable {
    pub fn new(profile: &TokenProfile) -> Self {
        Self {
            entries: profile
                .tokens()
                .into_iter()
                .map(|token| (token, token.resolver()))
                .collect(),
        }
    }

    pub fn full() -> Self {
        Self::new(&TokenProfile::Full)
    }

    pub fn reduced() -> Self {
        Self::new(&TokenProfile::Reduced)
    }

    /// Active tokens in table order
    pub fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.entries.iter().map(|(token, _)| *token)
    }

    pub fn contains(&self, token: Token) -> bool {
        self.entries.iter().any(|(t, _)| *t == token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(Token, Resolver)] {
        &self.entries
    }
}

impl Default for TokenTable {
    fn default() -> Self {
        Self::full()
    }
}

// =============================================================================
// Resolvers
// =============================================================================

fn show_name(scope: &Scope<'_>) -> String {
    scope.content.show_name.clone()
}

fn day_part(scope: &Scope<'_>) -> String {
    scope.content.day_part.clone()
}

fn formatted_minutes(scope: &Scope<'_>) -> String {
    format!("{:02}:{:02}", scope.now.hour(), scope.now.minute())
}

fn date_get_hours(scope: &Scope<'_>) -> String {
    format!("{:02}:00", scope.now.hour())
}

fn day_of_week(scope: &Scope<'_>) -> String {
    WEEKDAYS[scope.now.weekday().num_days_from_sunday() as usize].to_string()
}

fn month(scope: &Scope<'_>) -> String {
    format!("{:02}", scope.now.month())
}

fn date_get_date(scope: &Scope<'_>) -> String {
    format!("{:02}", scope.now.day())
}

fn date_get_full_year(scope: &Scope<'_>) -> String {
    scope.now.year().to_string()
}

fn platform(scope: &Scope<'_>) -> String {
    Platform::detect(scope.environment.user_agent()).to_string()
}

fn mvpd(scope: &Scope<'_>) -> String {
    scope.runtime.provider_id().unwrap_or_default().to_string()
}

fn initiate(scope: &Scope<'_>) -> String {
    if scope.runtime.flags().auto_play_requested() {
        "Auto Play".to_string()
    } else {
        "Manual".to_string()
    }
}

fn primary_category(scope: &Scope<'_>) -> String {
    scope
        .content
        .primary_category
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn secondary_category(scope: &Scope<'_>) -> String {
    scope
        .content
        .secondary_category
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn video_screen(scope: &Scope<'_>) -> String {
    if scope.runtime.is_full_screen() {
        "Full".to_string()
    } else {
        "Normal".to_string()
    }
}

fn asset_status(scope: &Scope<'_>) -> String {
    if scope.content.is_restricted() {
        "Restricted".to_string()
    } else {
        "Unrestricted".to_string()
    }
}

fn player_url(scope: &Scope<'_>) -> String {
    scope.environment.location().player_url().to_string()
}

fn episode_num(scope: &Scope<'_>) -> String {
    truthy_text(scope.content.air_order.as_ref())
}

fn guid(scope: &Scope<'_>) -> String {
    scope.content.guid.clone()
}

fn air_date(scope: &Scope<'_>) -> String {
    let Some(raw) = scope.content.air_date.as_ref().filter(|v| v.is_truthy()) else {
        return String::new();
    };

    match parse_air_date(raw, scope.environment) {
        Some(date) => format!("{}/{}/{}", date.month(), date.day(), date.year()),
        None => {
            warn!(air_date = %raw, "Unparseable air date");
            String::new()
        }
    }
}

fn season(scope: &Scope<'_>) -> String {
    truthy_text(scope.content.season_number.as_ref())
}

fn truthy_text(value: Option<&FieldValue>) -> String {
    value
        .filter(|v| v.is_truthy())
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Date-times carrying a numeric offset (`+0500` or `+05:00`)
const OFFSET_DATE_TIME_FORMATS: [&str; 1] = ["%Y-%m-%dT%H:%M:%S%.f%z"];

/// Date-times without an offset, read as local wall-clock time
const LOCAL_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Calendar dates; `%B` also accepts abbreviated month names
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y"];

/// Interpret a raw air date as a local calendar date.
///
/// Instants (RFC 3339, RFC 2822, numeric offsets, epoch milliseconds) are
/// converted to local time; local date-times and bare dates are taken as-is.
fn parse_air_date(raw: &FieldValue, environment: &dyn Environment) -> Option<NaiveDate> {
    match raw {
        FieldValue::Text(text) => parse_air_date_text(text.trim(), environment),
        FieldValue::Integer(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
            .map(|instant| environment.to_local(instant).date()),
        FieldValue::Float(millis) if millis.is_finite() => {
            DateTime::<Utc>::from_timestamp_millis(*millis as i64)
                .map(|instant| environment.to_local(instant).date())
        }
        _ => None,
    }
}

fn parse_air_date_text(text: &str, environment: &dyn Environment) -> Option<NaiveDate> {
    let instant = DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .or_else(|| {
            OFFSET_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(text, format).ok())
        });
    if let Some(instant) = instant {
        return Some(environment.to_local(instant.with_timezone(&Utc)).date());
    }

    LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|local| local.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        })
}
