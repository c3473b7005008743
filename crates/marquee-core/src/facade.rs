//! Metadata facade - the public surface
//!
//! Owns the content and runtime state, subscribes to the notification bus
//! at construction, and resolves templates against whatever was applied last.

use tracing::{debug, info};

use crate::{
    bus::{NotificationBus, Subscription},
    config::FacadeConfig,
    environment::Environment,
    state::{ContentState, QueryFlags, RuntimeContext},
    template::TemplateEngine,
    tokens::{Scope, TokenProfile, TokenTable},
    types::{ContentMetadataSnapshot, Notification, NotificationKind, PageContext},
    Error, Result,
};

/// Custom-data token resolver for one player instance
pub struct MetadataFacade {
    /// Last content metadata snapshot
    content: ContentState,
    /// Provider id, full-screen flag and query flags
    runtime: RuntimeContext,
    /// Active tokens
    table: TokenTable,
    /// Notification kinds this facade handles
    kinds: Vec<NotificationKind>,
    /// Clock, user agent and frame location
    environment: Box<dyn Environment>,
    /// Bus subscription (absent for detached facades)
    subscription: Option<Subscription>,
}

impl MetadataFacade {
    /// Create a facade subscribed to `bus`
    pub fn new(
        bus: &NotificationBus,
        profile: TokenProfile,
        flags: QueryFlags,
        environment: impl Environment + 'static,
    ) -> Self {
        let mut facade = Self::detached(profile, flags, environment);
        facade.subscription = Some(bus.subscribe(&facade.kinds));
        facade
    }

    /// Create a facade fed only through [`apply`](Self::apply)
    pub fn detached(
        profile: TokenProfile,
        flags: QueryFlags,
        environment: impl Environment + 'static,
    ) -> Self {
        let mut kinds = vec![
            NotificationKind::MetadataUpdated,
            NotificationKind::PageContextUpdated,
        ];
        if profile.tracks_full_screen() {
            kinds.push(NotificationKind::FullScreenChanged);
        }

        let table = TokenTable::new(&profile);
        info!(
            tokens = table.len(),
            autoplay = flags.auto_play_requested(),
            "Metadata facade created"
        );

        Self {
            content: ContentState::new(),
            runtime: RuntimeContext::new(flags),
            table,
            kinds,
            environment: Box::new(environment),
            subscription: None,
        }
    }

    /// Create a facade from configuration, using the system clock
    pub fn from_config(bus: &NotificationBus, config: &FacadeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            bus,
            config.token_profile()?,
            config.query_flags(),
            config.environment(),
        ))
    }

    /// True once a metadata snapshot has been received
    pub fn is_ready(&mut self) -> bool {
        self.sync();
        self.content.is_ready()
    }

    /// Resolve every active token in `template`.
    ///
    /// Returns `""` until metadata has arrived. Never fails: missing
    /// optional fields resolve to empty strings and unknown tokens are
    /// left in place.
    pub fn resolve(&mut self, template: &str) -> String {
        self.try_resolve(template).unwrap_or_default()
    }

    /// Like [`resolve`](Self::resolve), but reports [`Error::NotReady`]
    /// instead of returning `""` before metadata has arrived
    pub fn try_resolve(&mut self, template: &str) -> Result<String> {
        self.sync();
        let snapshot = self.content.snapshot().ok_or(Error::NotReady)?;
        let scope = Scope::new(snapshot, &self.runtime, self.environment.as_ref());
        Ok(TemplateEngine::resolve(template, &self.table, &scope))
    }

    /// Apply a notification directly
    pub fn apply(&mut self, notification: Notification) {
        let kind = notification.kind();
        if !self.kinds.contains(&kind) {
            debug!(kind = %kind, "Ignoring notification for untracked kind");
            return;
        }

        match notification {
            Notification::MetadataUpdated(snapshot) => self.on_metadata(snapshot),
            Notification::PageContextUpdated(context) => self.on_page_context(context),
            Notification::FullScreenChanged(full_screen) => self.on_full_screen(full_screen),
        }
    }

    /// Current content state
    pub fn content(&self) -> &ContentState {
        &self.content
    }

    /// Current runtime context
    pub fn runtime(&self) -> &RuntimeContext {
        &self.runtime
    }

    /// Active token table
    pub fn table(&self) -> &TokenTable {
        &self.table
    }

    /// Apply everything waiting on the bus
    fn sync(&mut self) {
        let pending = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return,
        };
        for notification in pending {
            self.apply(notification);
        }
    }

    fn on_metadata(&mut self, snapshot: ContentMetadataSnapshot) {
        debug!(show = %snapshot.show_name, guid = %snapshot.guid, "Content metadata updated");
        self.content.replace(snapshot);
    }

    fn on_page_context(&mut self, context: PageContext) {
        if self.runtime.set_provider_id(context.provider_id.as_deref()) {
            info!(provider_id = ?self.runtime.provider_id(), "Provider id updated");
        } else {
            debug!(candidate = ?context.provider_id, "Page context without usable provider id");
        }
    }

    fn on_full_screen(&mut self, full_screen: bool) {
        debug!(full_screen, "Full screen changed");
        self.runtime.set_full_screen(full_screen);
    }
}
