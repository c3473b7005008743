//! Content and runtime state
//!
//! Both records expose getters only. Mutation happens through the
//! notification handlers in [`MetadataFacade`](crate::MetadataFacade).

use url::form_urlencoded;

use crate::types::ContentMetadataSnapshot;

const AUTOPLAY: &str = "autoplay";
const FW_AUTOPLAY: &str = "fwautoplay";

/// Most recently received content metadata
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    snapshot: Option<ContentMetadataSnapshot>,
}

impl ContentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, if any has been received
    pub fn snapshot(&self) -> Option<&ContentMetadataSnapshot> {
        self.snapshot.as_ref()
    }

    /// True once at least one snapshot has been received
    pub fn is_ready(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Replace the snapshot wholesale; fields are never merged
    pub(crate) fn replace(&mut self, snapshot: ContentMetadataSnapshot) {
        self.snapshot = Some(snapshot);
    }
}

/// Autoplay flags captured once from the page query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFlags {
    /// `autoplay` value, `""` when absent
    pub autoplay: String,
    /// `fwautoplay` value, only captured when the query mentions it at all
    pub fw_autoplay: Option<String>,
}

impl QueryFlags {
    /// Capture the autoplay flags from a raw query string.
    ///
    /// Matching is case-insensitive because the whole query is lower-cased
    /// first, so captured values are lower-case too. Values are
    /// percent-decoded and `+` becomes a space.
    pub fn parse(query: &str) -> Self {
        let lowered = query.to_lowercase();
        let fw_autoplay = lowered
            .contains(FW_AUTOPLAY)
            .then(|| query_param(&lowered, FW_AUTOPLAY));

        Self {
            autoplay: query_param(&lowered, AUTOPLAY),
            fw_autoplay,
        }
    }

    /// Whether the page asked for playback to start on its own.
    ///
    /// A non-empty `fwautoplay` wins unless it is exactly `"false"`;
    /// otherwise `autoplay` must be exactly `"true"`.
    pub fn auto_play_requested(&self) -> bool {
        match self.fw_autoplay.as_deref() {
            Some(fw) if !fw.is_empty() => fw != "false",
            _ => self.autoplay == "true",
        }
    }
}

/// First value for `name`, or `""`
fn query_param(query: &str, name: &str) -> String {
    let query = query.split('#').next().unwrap_or_default();
    let query = query.strip_prefix('?').unwrap_or(query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Page-derived and player-derived runtime inputs
#[derive(Debug, Clone, Default)]
pub struct RuntimeContext {
    provider_id: Option<String>,
    full_screen: bool,
    flags: QueryFlags,
}

impl RuntimeContext {
    pub fn new(flags: QueryFlags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }

    /// Provider id, once one has been supplied
    pub fn provider_id(&self) -> Option<&str> {
        self.provider_id.as_deref()
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    pub fn flags(&self) -> &QueryFlags {
        &self.flags
    }

    /// Set the provider id. Empty values and the literal `"undefined"`
    /// are ignored and the previous id is kept. Returns true if applied.
    pub(crate) fn set_provider_id(&mut self, candidate: Option<&str>) -> bool {
        match candidate {
            Some(id) if is_usable_provider_id(id) => {
                self.provider_id = Some(id.to_string());
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_full_screen(&mut self, full_screen: bool) {
        self.full_screen = full_screen;
    }
}

/// Empty ids and the host's `"undefined"` sentinel never replace a known id
pub(crate) fn is_usable_provider_id(id: &str) -> bool {
    !id.is_empty() && id != "undefined"
}
