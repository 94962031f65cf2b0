//! The page-transition controller: the `change_page` state machine.
//!
//! A navigation runs RESOLVING -> (LOADING)? -> TRANSITIONING ->
//! COMMITTED, with FAILED reachable from the two middle states. The
//! engine is single-threaded and cooperative: loading and the visual
//! transition are performed by the environment, which reports back via
//! [`PageTransitionController::load_finished`] and
//! [`PageTransitionController::transition_finished`]. Each navigation
//! carries a sequence number; completions for a superseded sequence are
//! dropped, which is the entire cancellation discipline -- session
//! state mutates strictly in COMMITTED order.

use opal_types::{NavError, Result};

use crate::config::NavConfig;
use crate::event::{NavObserver, ObserverRegistry};
use crate::form;
use crate::history::{NavigationEntry, Reconciliation};
use crate::page::{Form, Page};
use crate::path::{self, ParsedUrl};
use crate::router::{self, Classified, Representation, RoutingStrategy};
use crate::session::NavSession;

// -----------------------------------------------------------------------
// Options & targets
// -----------------------------------------------------------------------

/// Options accepted by [`PageTransitionController::change_page`].
#[derive(Debug, Clone, Default)]
pub struct ChangeOptions {
    /// Allow transitioning to the already-active page.
    pub allow_same_page_transition: bool,
    /// Record this URL in history instead of the loaded one.
    pub data_url: Option<String>,
    /// Page role hint passed through to collaborators (e.g. "dialog").
    pub role: Option<String>,
}

/// A navigation target: a raw reference or an already-parsed URL.
#[derive(Debug, Clone)]
pub enum PageTarget {
    Reference(String),
    Parsed(ParsedUrl),
}

impl From<&str> for PageTarget {
    fn from(reference: &str) -> Self {
        Self::Reference(reference.to_string())
    }
}

impl From<String> for PageTarget {
    fn from(reference: String) -> Self {
        Self::Reference(reference)
    }
}

impl From<ParsedUrl> for PageTarget {
    fn from(url: ParsedUrl) -> Self {
        Self::Parsed(url)
    }
}

// -----------------------------------------------------------------------
// Phases & directives
// -----------------------------------------------------------------------

/// Where an in-flight navigation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Resolving,
    Loading,
    Transitioning,
    Committed,
    Failed,
}

/// What the engine asks of (or reports to) the environment after each
/// pump step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDirective {
    /// Fetch the external resource, then call `load_finished`.
    Load { seq: u64, url: ParsedUrl },
    /// Insert/activate the page and run the visual transition, then
    /// call `transition_finished`. For external targets `page` is the
    /// loaded markup with base-tag handling already applied; internal
    /// pages are in the document and carry `None`. `role` forwards the
    /// caller's page-role hint to the collaborator.
    Transition {
        seq: u64,
        page: Option<Page>,
        role: Option<String>,
    },
    /// Navigation committed; `location` is the browser-visible URL.
    Committed { location: String },
    /// Navigation failed; session rolled back to the committed entry.
    Failed,
    /// An observer vetoed the navigation; nothing changed.
    Vetoed,
    /// Target already active and same-page transitions not allowed.
    SamePage,
    /// The completion belonged to a cancelled navigation and was
    /// dropped without effect.
    Superseded,
}

/// Outcome of a native back/forward or hash-change signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationChange {
    /// The signal matched a stack entry; the cursor moved by `delta`.
    Traversed { delta: isize, location: String },
    /// Out-of-band URL: recorded as a fresh forward push.
    Pushed { location: String },
    /// Hash listening is disabled; signal ignored.
    Ignored,
}

// -----------------------------------------------------------------------
// In-flight task
// -----------------------------------------------------------------------

#[derive(Debug)]
struct InFlight {
    seq: u64,
    phase: TransitionPhase,
    /// The raw reference, for event payloads.
    target: String,
    /// Fully resolved page URL (for internal pages, the document URL).
    url: ParsedUrl,
    /// Internal page id, when the target is one.
    page_id: Option<String>,
    classified: Classified,
    strategy: RoutingStrategy,
    options: ChangeOptions,
    /// Pre-validated history override from [`ChangeOptions::data_url`].
    data_url: Option<ParsedUrl>,
    /// Loaded page markup, present from TRANSITIONING onward for
    /// external targets.
    page: Option<Page>,
    /// Commit via `replace` (query-string-only change to the active
    /// page) instead of `push`.
    replace: bool,
}

// -----------------------------------------------------------------------
// PageTransitionController
// -----------------------------------------------------------------------

/// Orchestrates navigations over a [`NavSession`].
#[derive(Debug)]
pub struct PageTransitionController {
    config: NavConfig,
    session: NavSession,
    observers: ObserverRegistry,
    in_flight: Option<InFlight>,
    next_seq: u64,
}

impl PageTransitionController {
    pub fn new(document_url: &str, config: NavConfig) -> Result<Self> {
        let session = NavSession::new(document_url, config.capabilities())?;
        Ok(Self {
            config,
            session,
            observers: ObserverRegistry::new(),
            in_flight: None,
            next_seq: 0,
        })
    }

    pub fn session(&self) -> &NavSession {
        &self.session
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn register_observer(&mut self, observer: Box<dyn NavObserver>) {
        self.observers.register(observer);
    }

    /// Phase of the in-flight navigation, if one exists.
    pub fn in_flight_phase(&self) -> Option<TransitionPhase> {
        self.in_flight.as_ref().map(|task| task.phase)
    }

    /// The browser-visible URL (always the last committed entry's).
    pub fn location(&self) -> &str {
        self.session.location()
    }

    // -------------------------------------------------------------------
    // RESOLVING
    // -------------------------------------------------------------------

    /// Start a navigation.
    ///
    /// Resolves and classifies the target synchronously. Fast failures
    /// (`MalformedUrl`, `UnresolvableTarget`, observer veto, same-page
    /// no-op) leave every piece of session state untouched. Otherwise a
    /// directive tells the environment what to do next; any navigation
    /// still in flight is cancelled first.
    pub fn change_page(
        &mut self,
        target: impl Into<PageTarget>,
        options: ChangeOptions,
    ) -> Result<NavDirective> {
        let raw = match target.into() {
            PageTarget::Reference(reference) => reference,
            PageTarget::Parsed(url) => url.href(),
        };

        let classified = router::classify(&raw, self.config.capabilities());
        let strategy = RoutingStrategy::select(self.config.capabilities());

        let (url, page_id) = if classified.is_internal {
            let id = raw
                .strip_prefix('#')
                .unwrap_or(&raw)
                .to_string();
            let mut url = self.session.document_url().clone();
            url.hash = format!("#{id}");
            (url, Some(id))
        } else {
            (self.resolve_external(&raw)?, None)
        };

        // A history override is only recorded at commit; validate it
        // now so a bad one fails before any state changes.
        let data_url = options.data_url.as_deref().map(path::parse_url).transpose()?;

        // Same-page: identical target is a no-op unless explicitly
        // allowed; a query-string-only difference updates the active
        // slot in place.
        let mut replace = false;
        if let Some(active) = self.session.active_entry() {
            let same_path = active.url.directory == url.directory
                && active.url.filename == url.filename
                && active.is_internal == classified.is_internal
                && active.hash.as_deref() == page_id.as_deref();
            if same_path {
                if active.url.search == url.search && !options.allow_same_page_transition {
                    log::debug!("change_page: already on {raw}, ignoring");
                    return Ok(NavDirective::SamePage);
                }
                if active.url.search != url.search {
                    replace = true;
                }
            }
        }

        if !self.observers.before_navigate(&raw) {
            log::debug!("change_page: {raw} vetoed by observer");
            return Ok(NavDirective::Vetoed);
        }

        if let Some(cancelled) = self.in_flight.take() {
            // Cancelled, not failed: its completions will be dropped
            // and no failed event fires for it.
            log::warn!(
                "change_page: superseding in-flight navigation to {} (seq {})",
                cancelled.target,
                cancelled.seq
            );
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let is_internal = classified.is_internal;
        let load_url = url.clone();
        let role = options.role.clone();
        self.in_flight = Some(InFlight {
            seq,
            phase: if is_internal {
                TransitionPhase::Transitioning
            } else {
                TransitionPhase::Loading
            },
            target: raw,
            url,
            page_id,
            classified,
            strategy,
            options,
            data_url,
            page: None,
            replace,
        });

        if is_internal {
            Ok(NavDirective::Transition {
                seq,
                page: None,
                role,
            })
        } else {
            log::debug!("change_page: loading {} (seq {seq})", load_url.pathname());
            Ok(NavDirective::Load { seq, url: load_url })
        }
    }

    /// Resolve an external reference against the correct base
    /// directory.
    fn resolve_external(&self, raw: &str) -> Result<ParsedUrl> {
        // A bare word with no path, extension, or query is a page id
        // missing its `#` prefix: invalid input, never coerced into a
        // path lookup.
        if path::is_relative(raw) && !raw.contains(['/', '.', '?']) {
            return Err(NavError::UnresolvableTarget(raw.to_string()));
        }

        let base = ParsedUrl {
            directory: self.resolution_directory(),
            ..self.session.document_url().clone()
        };
        path::make_url_absolute(raw, &base)
    }

    /// The directory relative references resolve against: the active
    /// page's when base handling is enabled, the document's original
    /// one when the feature is off.
    fn resolution_directory(&self) -> String {
        if self.session.base().enabled() {
            self.session.active_directory()
        } else {
            self.session.document_url().directory.clone()
        }
    }

    // -------------------------------------------------------------------
    // LOADING -> TRANSITIONING
    // -------------------------------------------------------------------

    /// Report the outcome of an external page load.
    ///
    /// A stale `seq` (cancelled navigation) is dropped without any
    /// effect -- including the failure path.
    pub fn load_finished(
        &mut self,
        seq: u64,
        outcome: std::result::Result<Page, String>,
    ) -> Result<NavDirective> {
        let Some(mut task) = self.in_flight.take() else {
            log::warn!("load_finished: no navigation in flight (seq {seq})");
            return Ok(NavDirective::Superseded);
        };
        if task.seq != seq || task.phase != TransitionPhase::Loading {
            log::warn!("load_finished: dropping stale completion (seq {seq})");
            self.in_flight = Some(task);
            return Ok(NavDirective::Superseded);
        }

        match outcome {
            Ok(mut page) => {
                // Base-tag handling happens exactly once, at insertion
                // time, against the new page's directory.
                self.session
                    .base()
                    .prepare_inserted_page(&mut page, &task.url.directory);
                task.page = Some(page.clone());
                task.phase = TransitionPhase::Transitioning;
                let role = task.options.role.clone();
                self.in_flight = Some(task);
                Ok(NavDirective::Transition {
                    seq,
                    page: Some(page),
                    role,
                })
            },
            Err(reason) => {
                self.fail(
                    &task,
                    NavError::LoadFailure {
                        url: task.url.pathname(),
                        reason,
                    },
                );
                Ok(NavDirective::Failed)
            },
        }
    }

    // -------------------------------------------------------------------
    // TRANSITIONING -> COMMITTED
    // -------------------------------------------------------------------

    /// Report the outcome of page insertion/activation and the visual
    /// transition. On success the navigation commits: history and
    /// base-tag state update, then the visible URL synchronizes --
    /// only now is the navigation externally observable.
    pub fn transition_finished(
        &mut self,
        seq: u64,
        outcome: std::result::Result<(), String>,
    ) -> Result<NavDirective> {
        let Some(task) = self.in_flight.take() else {
            log::warn!("transition_finished: no navigation in flight (seq {seq})");
            return Ok(NavDirective::Superseded);
        };
        if task.seq != seq || task.phase != TransitionPhase::Transitioning {
            log::warn!("transition_finished: dropping stale completion (seq {seq})");
            self.in_flight = Some(task);
            return Ok(NavDirective::Superseded);
        }

        if let Err(reason) = outcome {
            self.fail(
                &task,
                NavError::TransitionFailure {
                    url: task.target.clone(),
                    reason,
                },
            );
            return Ok(NavDirective::Failed);
        }

        let entry = self.build_entry(&task);
        if task.replace {
            self.session.history_mut().replace(entry.clone());
        } else {
            self.session.history_mut().push(entry.clone());
        }
        self.session.base_mut().commit_directory(&entry.url.directory);

        let location = router::url_for(&entry, task.strategy, self.session.document_url());
        self.session.set_location(location.clone());

        if let Some(role) = &task.options.role {
            log::debug!("committed {} with role {role}", task.target);
        }
        log::info!(
            "committed {} -> {location} (stack {} @ {})",
            task.target,
            self.session.history().len(),
            self.session.history().active_index()
        );
        self.observers.committed(&entry);
        Ok(NavDirective::Committed { location })
    }

    fn build_entry(&self, task: &InFlight) -> NavigationEntry {
        let mut url = task.data_url.clone().unwrap_or_else(|| task.url.clone());
        let hash = match &task.page_id {
            Some(id) => Some(id.clone()),
            None => url.fragment().map(str::to_string),
        };
        if task.classified.is_internal {
            // Internal pages live at the document URL; the fragment is
            // carried separately.
            url.hash = String::new();
        }

        let title = task
            .page
            .as_ref()
            .map(|page| page.title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.config.default_title.clone());

        let mut entry = NavigationEntry {
            url,
            hash,
            is_internal: task.classified.is_internal,
            title,
            degraded_href: None,
        };
        if !entry.is_internal && task.classified.representation == Representation::Hash {
            entry.degraded_href = Some(router::url_for(
                &entry,
                RoutingStrategy::HashOnly,
                self.session.document_url(),
            ));
        }
        entry
    }

    // -------------------------------------------------------------------
    // FAILED
    // -------------------------------------------------------------------

    /// Abandon a navigation: no stack or base mutation has happened,
    /// so rollback is re-asserting the committed entry's URL. The
    /// failure event is the only externally visible effect.
    fn fail(&mut self, task: &InFlight, reason: NavError) {
        let strategy = RoutingStrategy::select(self.config.capabilities());
        let committed = self
            .session
            .active_entry()
            .map(|entry| router::url_for(entry, strategy, self.session.document_url()));
        if let Some(location) = committed {
            self.session.set_location(location);
        }
        log::warn!("navigation to {} failed: {reason}", task.target);
        self.observers.failed(&task.target, &reason);
    }

    // -------------------------------------------------------------------
    // Native history signals
    // -------------------------------------------------------------------

    /// Reconcile a native back/forward (popstate) or hash-change signal
    /// against the history stack. A URL matching no entry is an
    /// out-of-band navigation and becomes a fresh forward push rather
    /// than a guessed stack position.
    pub fn handle_location_change(&mut self, observed: &str) -> Result<LocationChange> {
        let parsed = path::parse_url(observed)?;
        let observed_url = if parsed.is_bare_fragment() {
            if !self.config.hash_listening_enabled {
                log::debug!("hash change ignored (listening disabled): {observed}");
                return Ok(LocationChange::Ignored);
            }
            let mut url = self.session.document_url().clone();
            url.hash = parsed.hash.clone();
            url
        } else {
            parsed
        };

        // Under hash routing a native signal re-delivers the degraded
        // representation; reconcile against the decoded external URL so
        // traversal over a degraded entry finds its stack slot.
        let reconcile_url = self
            .decode_degraded(&observed_url)
            .unwrap_or_else(|| observed_url.clone());

        match self.session.history_mut().reconcile(&reconcile_url) {
            Reconciliation::Moved { index, delta } => {
                let entry = self.session.history().entries()[index].clone();
                self.session.base_mut().commit_directory(&entry.url.directory);
                let location = router::url_for(
                    &entry,
                    RoutingStrategy::select(self.config.capabilities()),
                    self.session.document_url(),
                );
                self.session.set_location(location.clone());
                log::debug!("history traversal by {delta} to {location}");
                Ok(LocationChange::Traversed { delta, location })
            },
            Reconciliation::Missed => {
                log::warn!("reconciliation miss for {observed}; pushing fresh entry");
                let entry = self.entry_for_observed(&observed_url);
                self.session.history_mut().push(entry.clone());
                self.session.base_mut().commit_directory(&entry.url.directory);
                let location = router::url_for(
                    &entry,
                    RoutingStrategy::select(self.config.capabilities()),
                    self.session.document_url(),
                );
                self.session.set_location(location.clone());
                Ok(LocationChange::Pushed { location })
            },
        }
    }

    /// Decode the degraded hash representation: a fragment containing
    /// a slash on the document's own path encodes an external page URL.
    fn decode_degraded(&self, observed: &ParsedUrl) -> Option<ParsedUrl> {
        let document = self.session.document_url();
        let fragment = observed.fragment()?;
        if observed.directory != document.directory
            || observed.filename != document.filename
            || !fragment.contains('/')
        {
            return None;
        }
        path::parse_url(fragment).ok()
    }

    /// Build a stack entry for an out-of-band observed URL, decoding
    /// the degraded hash-encoded form back into an external entry.
    fn entry_for_observed(&self, observed: &ParsedUrl) -> NavigationEntry {
        if let Some(mut url) = self.decode_degraded(observed) {
            let hash = url.fragment().map(str::to_string);
            url.hash = String::new();
            return NavigationEntry {
                url,
                hash,
                is_internal: false,
                title: self.config.default_title.clone(),
                degraded_href: Some(observed.href()),
            };
        }

        let document = self.session.document_url();
        if let Some(fragment) = observed.fragment()
            && observed.directory == document.directory
            && observed.filename == document.filename
        {
            let mut url = observed.clone();
            url.hash = String::new();
            return NavigationEntry {
                url,
                hash: Some(fragment.to_string()),
                is_internal: true,
                title: self.config.default_title.clone(),
                degraded_href: None,
            };
        }

        let mut url = observed.clone();
        url.hash = String::new();
        NavigationEntry {
            url,
            hash: observed.fragment().map(str::to_string),
            is_internal: false,
            title: self.config.default_title.clone(),
            degraded_href: None,
        }
    }

    // -------------------------------------------------------------------
    // Form submission
    // -------------------------------------------------------------------

    /// Submit a form with GET-equivalent semantics: the effective
    /// target is the resolved action plus the query string built from
    /// the form's fields, routed through `change_page`. Submission to
    /// the active page updates the current history slot in place.
    pub fn submit_form(&mut self, form: &Form, options: ChangeOptions) -> Result<NavDirective> {
        let action = form::resolve_action(form, &self.session);
        let query = path::encode_query(&form.fields);
        let target = if query.is_empty() {
            action
        } else {
            format!("{action}?{query}")
        };
        self.change_page(target, options)
    }
}
