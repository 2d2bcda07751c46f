use crate::clock::Clock;
use crate::criteria::SearchQuery;
use crate::models::PropertyRecord;
use crate::normalize::normalize_all;
use crate::notify::{Toaster, Variant};
use crate::results::selection::Selection;
use crate::store::{ErrorCode, PropertyStore, StoreError, PROPERTIES_COLLECTION};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub const PROPERTY_TYPE_FIELD: &str = "propertyType";

pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Please check your permissions.";
pub const NOT_FOUND_MESSAGE: &str = "The requested data could not be found.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch properties. Please try again later.";
pub const EMPTY_MESSAGE: &str = "No properties found matching your criteria";

/// What the results screen is showing
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Success(Vec<PropertyRecord>),
    Empty,
    Error(String),
}

impl LoadState {
    pub fn records(&self) -> &[PropertyRecord] {
        match self {
            LoadState::Success(records) => records,
            _ => &[],
        }
    }
}

/// Terminal state of one fetch plus the toast that announces it
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub state: LoadState,
    pub message: String,
    pub variant: Variant,
}

impl SearchOutcome {
    fn error(message: String) -> Self {
        Self {
            state: LoadState::Error(message.clone()),
            message,
            variant: Variant::Error,
        }
    }
}

/// User-facing text for a failed fetch
pub fn error_message(err: &StoreError) -> String {
    match err.code {
        ErrorCode::PermissionDenied => ACCESS_DENIED_MESSAGE.to_string(),
        ErrorCode::NotFound => NOT_FOUND_MESSAGE.to_string(),
        _ if !err.message.trim().is_empty() => err.message.clone(),
        _ => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}

/// Run the search for `query` and classify the result.
///
/// Issues at most one store call; none when a required parameter is missing.
pub async fn fetch_results(store: &dyn PropertyStore, query: &SearchQuery, now: DateTime<Utc>) -> SearchOutcome {
    debug!("Search parameters: {:?}", query);

    let required = match query.require() {
        Ok(required) => required,
        Err(err) => {
            warn!("Rejected search: {}", err);
            return SearchOutcome::error(err.to_string());
        }
    };

    debug!(
        "Location {:?} and radius {:?} are not part of the store filter",
        required.location, required.radius
    );

    let docs = match store
        .query_by_equality(PROPERTIES_COLLECTION, PROPERTY_TYPE_FIELD, required.property_type)
        .await
    {
        Ok(docs) => docs,
        Err(err) => {
            error!("Query against {} failed: {}", store.store_name(), err);
            return SearchOutcome::error(error_message(&err));
        }
    };

    info!("Query returned {} documents", docs.len());

    let records = normalize_all(&docs, now);
    if records.is_empty() {
        return SearchOutcome {
            state: LoadState::Empty,
            message: EMPTY_MESSAGE.to_string(),
            variant: Variant::Info,
        };
    }

    SearchOutcome {
        message: format!("Found {} properties", records.len()),
        state: LoadState::Success(records),
        variant: Variant::Success,
    }
}

struct Shared {
    state: LoadState,
    /// Fetch allowed to publish its result; `None` once torn down
    active: Option<u64>,
}

/// Results page: one fetch per navigation, a selection, and a toast slot.
///
/// A fetch that resolves after `unmount` (or after a newer navigation) is
/// discarded without touching state.
pub struct ResultsScreen {
    store: Arc<dyn PropertyStore>,
    clock: Arc<dyn Clock>,
    toaster: Toaster,
    shared: Arc<Mutex<Shared>>,
    query: SearchQuery,
    next_fetch: u64,
    selection: Selection,
    task: Option<JoinHandle<()>>,
}

impl ResultsScreen {
    /// Mount the screen for `query` and start fetching. Must be called inside
    /// a tokio runtime.
    pub fn mount(store: Arc<dyn PropertyStore>, query: &str, clock: Arc<dyn Clock>, toaster: Toaster) -> Self {
        let mut screen = Self {
            store,
            clock,
            toaster,
            shared: Arc::new(Mutex::new(Shared {
                state: LoadState::Loading,
                active: None,
            })),
            query: SearchQuery::parse(query),
            next_fetch: 0,
            selection: Selection::new(),
            task: None,
        };
        screen.start_fetch();
        screen
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn start_fetch(&mut self) {
        self.next_fetch += 1;
        let fetch_id = self.next_fetch;
        {
            let mut shared = self.lock();
            shared.active = Some(fetch_id);
            shared.state = LoadState::Loading;
        }

        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        let toaster = self.toaster.clone();
        let shared = Arc::clone(&self.shared);
        let query = self.query.clone();

        self.task = Some(tokio::spawn(async move {
            let outcome = fetch_results(store.as_ref(), &query, clock.now()).await;

            let mut shared = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if shared.active != Some(fetch_id) {
                debug!("Discarding result of superseded fetch {}", fetch_id);
                return;
            }
            shared.state = outcome.state;
            toaster.show(outcome.message, outcome.variant);
        }));
    }

    /// Follow a new navigation target. Unchanged parameters keep the current
    /// result; changed ones start a fresh fetch and clear the selection.
    pub fn navigate(&mut self, query: &str) {
        let query = SearchQuery::parse(query);
        if query == self.query {
            return;
        }
        self.query = query;
        self.selection.clear();
        self.start_fetch();
    }

    /// Wait for the in-flight fetch, if any, to finish
    pub async fn settled(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!("Results fetch task failed: {}", err);
            }
        }
    }

    /// Tear the screen down. Later fetch results are ignored.
    pub fn unmount(&mut self) {
        self.lock().active = None;
        self.selection.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().active.is_some()
    }

    pub fn state(&self) -> LoadState {
        self.lock().state.clone()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn toaster(&self) -> &Toaster {
        &self.toaster
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Tick or untick a row. Ids not in the current result are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        let known = self.lock().state.records().iter().any(|r| r.id == id);
        if !known {
            warn!("Ignoring selection of unknown property {}", id);
            return false;
        }
        self.selection.toggle(id);
        true
    }
}

impl Drop for ResultsScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}
