use crate::client::PropertyApi;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::models::PropertyResult;
use crate::search::{translate, url_state, PageRequest, SearchFilters};
use crate::store::{self, StateStore};
use crate::view::ResultSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct SessionState {
    filters: SearchFilters,
    results: ResultSet,
    loading: bool,
}

/// Outcome of opening a single listing
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loaded(Box<PropertyResult>),
    /// The listing does not exist (HTTP 404)
    NotFound { back_to_search: String },
    /// Anything else went wrong
    Failed { back_to_search: String },
}

impl DetailState {
    /// Static text shown in place of the listing
    pub fn message(&self) -> Option<&'static str> {
        match self {
            DetailState::Loaded(_) => None,
            DetailState::NotFound { .. } => Some("This property is no longer available."),
            DetailState::Failed { .. } => Some("We couldn't load this property. Please try again."),
        }
    }

    /// Query string of the search to go back to, for the error states
    pub fn back_to_search(&self) -> Option<&str> {
        match self {
            DetailState::Loaded(_) => None,
            DetailState::NotFound { back_to_search } | DetailState::Failed { back_to_search } => {
                Some(back_to_search)
            }
        }
    }
}

/// One search page: current filters, the result set both views render, and
/// the debounced trigger between them.
///
/// Must be created inside a tokio runtime.
pub struct SearchSession {
    api: Arc<dyn PropertyApi>,
    store: Arc<dyn StateStore>,
    shared: Arc<RwLock<SessionState>>,
    debouncer: Debouncer<SearchFilters>,
    limit: u32,
}

impl SearchSession {
    pub fn new(
        api: Arc<dyn PropertyApi>,
        store: Arc<dyn StateStore>,
        debounce_window: Duration,
        limit: u32,
    ) -> Self {
        let filters = match store::load(store.as_ref(), store::SEARCH_FILTERS) {
            Ok(Some(filters)) => {
                debug!("Restored saved filters: {:?}", filters);
                filters
            }
            Ok(None) => SearchFilters::default(),
            Err(e) => {
                warn!("Could not restore saved filters: {}", e);
                SearchFilters::default()
            }
        };

        let shared = Arc::new(RwLock::new(SessionState {
            filters,
            ..Default::default()
        }));

        let debouncer = {
            let api = api.clone();
            let shared = shared.clone();
            Debouncer::spawn(debounce_window, move |filters: SearchFilters| {
                let api = api.clone();
                let shared = shared.clone();
                async move {
                    run_search(api.as_ref(), &shared, &filters, PageRequest::new(1, limit)).await;
                }
            })
        };

        Self {
            api,
            store,
            shared,
            debouncer,
            limit,
        }
    }

    pub async fn filters(&self) -> SearchFilters {
        self.shared.read().await.filters.clone()
    }

    /// Replace and persist the filters without scheduling a search
    pub async fn set_filters(&self, filters: SearchFilters) {
        // File-backed stores do blocking IO
        let state_store = self.store.clone();
        let to_save = filters.clone();
        let saved = tokio::task::spawn_blocking(move || {
            store::save(state_store.as_ref(), store::SEARCH_FILTERS, &to_save)
        })
        .await;

        match saved {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Could not persist filters: {}", e),
            Err(e) => warn!("Filter persistence task failed: {}", e),
        }
        self.shared.write().await.filters = filters;
    }

    /// Replace the filters, persist them, and schedule a debounced search
    pub async fn update_filters(&self, filters: SearchFilters) {
        self.set_filters(filters.clone()).await;
        if !self.debouncer.push(filters) {
            warn!("Debounce task has stopped; filter change will not trigger a search");
        }
    }

    /// Load filters from a shared URL query string
    pub async fn apply_query_string(&self, query: &str) {
        self.update_filters(url_state::from_query_string(query)).await;
    }

    /// Query string that reproduces the current filters
    pub async fn share_query(&self) -> String {
        url_state::to_query_string(&self.shared.read().await.filters)
    }

    /// Search right away with the current filters, skipping the debounce.
    /// Returns how many results are now shown.
    pub async fn search_now(&self, page: u32) -> usize {
        let filters = self.filters().await;
        run_search(
            self.api.as_ref(),
            &self.shared,
            &filters,
            PageRequest::new(page, self.limit),
        )
        .await;
        self.shared.read().await.results.len()
    }

    /// Snapshot of the result set
    pub async fn results(&self) -> ResultSet {
        self.shared.read().await.results.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.shared.read().await.loading
    }

    /// Hover a listing from the list or the map
    pub async fn hover(&self, id: &str) -> bool {
        self.shared.write().await.results.hover(id)
    }

    pub async fn clear_hover(&self) {
        self.shared.write().await.results.clear_hover();
    }

    /// Fetch a single listing for the detail view
    pub async fn open_property(&self, id_or_slug: &str) -> DetailState {
        match self.api.get_property(id_or_slug).await {
            Ok(property) => DetailState::Loaded(Box::new(property)),
            Err(ApiError::NotFound(_)) => {
                info!("Listing {} not found", id_or_slug);
                DetailState::NotFound {
                    back_to_search: self.share_query().await,
                }
            }
            Err(e) => {
                warn!("Failed to load listing {}: {}", id_or_slug, e);
                DetailState::Failed {
                    back_to_search: self.share_query().await,
                }
            }
        }
    }
}

/// Translate, fetch, and swap the result set. Failures leave it empty.
async fn run_search(
    api: &dyn PropertyApi,
    shared: &RwLock<SessionState>,
    filters: &SearchFilters,
    page: PageRequest,
) {
    let params = translate(filters, page);
    shared.write().await.loading = true;

    let outcome = api.search(&params).await;

    let mut state = shared.write().await;
    match outcome {
        Ok(results) => {
            debug!("{} returned {} results", api.source_name(), results.len());
            state.results.replace(results);
        }
        Err(e) => {
            warn!("Search against {} failed: {}", api.source_name(), e);
            state.results.clear();
        }
    }
    state.loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PropertyQueryParameters;
    use crate::store::{JsonFileStore, MemoryStore};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        listings: Vec<PropertyResult>,
        fail: AtomicBool,
        calls: Mutex<Vec<PropertyQueryParameters>>,
    }

    impl FakeApi {
        fn with_listings(ids: &[&str]) -> Self {
            let listings = ids
                .iter()
                .map(|id| {
                    serde_json::from_value(json!({
                        "id": id,
                        "latitude": -12.1,
                        "longitude": -77.0
                    }))
                    .unwrap()
                })
                .collect();
            Self {
                listings,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<PropertyQueryParameters> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PropertyApi for FakeApi {
        async fn search(
            &self,
            params: &PropertyQueryParameters,
        ) -> Result<Vec<PropertyResult>, ApiError> {
            self.calls.lock().unwrap().push(params.clone());
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            Ok(self.listings.clone())
        }

        async fn get_property(&self, id_or_slug: &str) -> Result<PropertyResult, ApiError> {
            match id_or_slug {
                "broken" => Err(ApiError::Status(StatusCode::BAD_GATEWAY)),
                id => self
                    .listings
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .ok_or_else(|| ApiError::NotFound(id.to_string())),
            }
        }

        fn source_name(&self) -> &'static str {
            "fake"
        }
    }

    fn session(api: Arc<FakeApi>, store: Arc<MemoryStore>) -> SearchSession {
        SearchSession::new(api, store, Duration::from_millis(500), 20)
    }

    fn filters(location: &str) -> SearchFilters {
        SearchFilters {
            location: Some(location.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_now_fills_results() {
        let api = Arc::new(FakeApi::with_listings(&["a", "b"]));
        let session = session(api.clone(), Arc::new(MemoryStore::new()));

        session.update_filters(filters("departamento en miraflores")).await;
        assert_eq!(session.search_now(2).await, 2);

        let calls = api.calls();
        let last = calls.last().unwrap();
        assert_eq!(last.location.as_deref(), Some("miraflores"));
        assert_eq!(last.page, 2);
        assert_eq!(last.limit, 20);
        assert!(!session.is_loading().await);

        let results = session.results().await;
        assert_eq!(results.markers().len(), 2);
        assert!(results.viewport().is_some());
    }

    #[tokio::test]
    async fn test_failure_empties_results() {
        let api = Arc::new(FakeApi::with_listings(&["a"]));
        let session = session(api.clone(), Arc::new(MemoryStore::new()));

        assert_eq!(session.search_now(1).await, 1);
        assert!(session.hover("a").await);

        api.fail.store(true, Ordering::SeqCst);
        assert_eq!(session.search_now(1).await, 0);

        let results = session.results().await;
        assert!(results.is_empty());
        assert_eq!(results.hovered(), None);
        assert!(!session.is_loading().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_burst_triggers_one_search() {
        let api = Arc::new(FakeApi::with_listings(&["a"]));
        let session = session(api.clone(), Arc::new(MemoryStore::new()));

        for place in ["b", "ba", "bar", "barr", "barranco"] {
            session.update_filters(filters(place)).await;
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(api.calls().is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].location.as_deref(), Some("barranco"));
        assert_eq!(session.results().await.len(), 1);
    }

    #[tokio::test]
    async fn test_filters_persist_and_restore() {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(FakeApi::default());

        {
            let session = session(api.clone(), store.clone());
            session.apply_query_string("?location=surco&bedrooms=3").await;
            assert_eq!(session.share_query().await, "location=surco&bedrooms=3");
        }

        let session = session(api, store);
        let restored = session.filters().await;
        assert_eq!(restored.location.as_deref(), Some("surco"));
        assert_eq!(restored.bedrooms, Some(3));
    }

    #[tokio::test]
    async fn test_filters_persist_to_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let api = Arc::new(FakeApi::default());

        {
            let store = Arc::new(JsonFileStore::open(&path).unwrap());
            let session = SearchSession::new(api.clone(), store, Duration::from_millis(500), 20);
            session.set_filters(filters("chorrillos")).await;
        }

        let store = JsonFileStore::open(&path).unwrap();
        let saved = store::load(&store, store::SEARCH_FILTERS).unwrap().unwrap();
        assert_eq!(saved.location.as_deref(), Some("chorrillos"));
    }

    #[tokio::test]
    async fn test_unwritable_store_keeps_filters_in_session() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("sub");
        let store = Arc::new(JsonFileStore::open(parent.join("state.json")).unwrap());
        std::fs::write(&parent, "").unwrap();

        let session = SearchSession::new(
            Arc::new(FakeApi::default()),
            store.clone(),
            Duration::from_millis(500),
            20,
        );
        session.set_filters(filters("rimac")).await;

        assert_eq!(session.filters().await.location.as_deref(), Some("rimac"));
        assert_eq!(store::load(store.as_ref(), store::SEARCH_FILTERS).unwrap(), None);
    }

    #[tokio::test]
    async fn test_open_property_states() {
        let api = Arc::new(FakeApi::with_listings(&["a"]));
        let session = session(api, Arc::new(MemoryStore::new()));
        session.update_filters(filters("lince")).await;

        let loaded = session.open_property("a").await;
        assert!(matches!(&loaded, DetailState::Loaded(p) if p.id == "a"));
        assert_eq!(loaded.message(), None);

        let missing = session.open_property("zzz").await;
        assert!(matches!(missing, DetailState::NotFound { .. }));
        assert_eq!(missing.back_to_search(), Some("location=lince"));
        assert_eq!(
            missing.message(),
            Some("This property is no longer available.")
        );

        let broken = session.open_property("broken").await;
        assert!(matches!(broken, DetailState::Failed { .. }));
        assert_eq!(
            broken.message(),
            Some("We couldn't load this property. Please try again.")
        );
    }
}
