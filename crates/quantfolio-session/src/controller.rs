//! Session orchestration.

use futures::future::join_all;
use quantfolio_core::error::SessionError;
use quantfolio_core::traits::UploadFile;
use quantfolio_core::types::{CombinedTable, SymbolSeries, SymbolUniverse, COMBINED_WINDOW};
use quantfolio_data::{align, FallbackGenerator, SourceLoader};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::state::{LoadStatus, SessionNotice, SessionState};

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Most recent dates kept in the combined table
    pub window: usize,
    /// Load symbols concurrently instead of one after another
    pub parallel: bool,
    /// Seed for fallback data; `None` draws from entropy
    pub fallback_seed: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            window: COMBINED_WINDOW,
            parallel: false,
            fallback_seed: None,
        }
    }
}

/// Which pipeline produced a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Static,
    Uploads,
}

/// Identifies one load; only the latest ticket may apply its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    origin: LoadOrigin,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }
}

enum Source {
    Static,
    Upload(Arc<dyn UploadFile>),
}

/// The I/O half of a load, detached from the controller so it can run
/// while newer loads are started.
pub struct LoadPlan {
    origin: LoadOrigin,
    loader: SourceLoader,
    universe: SymbolUniverse,
    jobs: Vec<(String, Source)>,
    window: usize,
    parallel: bool,
}

impl LoadPlan {
    /// Symbols this plan will attempt, in universe order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.jobs.iter().map(|(s, _)| s.as_str())
    }

    /// Load every symbol and align the results.
    pub async fn execute(self) -> LoadOutcome {
        let loader = &self.loader;
        let load_one = |symbol: &str, source: &Source| {
            let symbol = symbol.to_string();
            let file = match source {
                Source::Static => None,
                Source::Upload(f) => Some(Arc::clone(f)),
            };
            async move {
                match file {
                    None => loader.load_static(&symbol).await,
                    Some(f) => loader.load_upload(&symbol, f.as_ref()).await,
                }
            }
        };

        let results: Vec<SymbolSeries> = if self.parallel {
            join_all(self.jobs.iter().map(|(s, src)| load_one(s.as_str(), src))).await
        } else {
            let mut out = Vec::with_capacity(self.jobs.len());
            for (s, src) in &self.jobs {
                out.push(load_one(s.as_str(), src).await);
            }
            out
        };

        let mut series = HashMap::new();
        let mut loaded = Vec::new();
        for ((symbol, _), result) in self.jobs.iter().zip(results) {
            if !result.is_empty() {
                loaded.push(symbol.clone());
                series.insert(symbol.clone(), result);
            }
        }

        LoadOutcome {
            origin: self.origin,
            attempted: self.jobs.len(),
            loaded,
            table: align(&series, &self.universe, self.window),
        }
    }
}

/// Result of executing a [`LoadPlan`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub origin: LoadOrigin,
    /// Number of symbols attempted
    pub attempted: usize,
    /// Symbols that produced a non-empty series, in universe order
    pub loaded: Vec<String>,
    /// Aligned table of the loaded symbols
    pub table: CombinedTable,
}

/// Owns and mutates the [`SessionState`].
pub struct SessionController {
    state: SessionState,
    universe: SymbolUniverse,
    loader: SourceLoader,
    fallback: FallbackGenerator,
    options: SessionOptions,
    generation: u64,
    rng: StdRng,
}

impl SessionController {
    /// Create an idle controller with an empty table.
    pub fn new(
        universe: SymbolUniverse,
        loader: SourceLoader,
        fallback: FallbackGenerator,
        options: SessionOptions,
    ) -> Self {
        let rng = match options.fallback_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };
        Self {
            state: SessionState::new(universe.symbols().to_vec()),
            universe,
            loader,
            fallback,
            options,
            generation: 0,
            rng,
        }
    }

    /// Current state, read-only.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn universe(&self) -> &SymbolUniverse {
        &self.universe
    }

    /// Latest load generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn fallback_table(&mut self) -> CombinedTable {
        self.fallback.generate(&mut self.rng)
    }

    /// Show fallback data without a notice. Invalidates in-flight loads.
    pub fn seed_fallback(&mut self) {
        self.generation += 1;
        self.state.data = self.fallback_table();
        self.state.loading = false;
        self.state.error = None;
        self.state.status = LoadStatus::Fallback;
        debug!(generation = self.generation, "seeded fallback data");
    }

    fn begin(&mut self, origin: LoadOrigin, jobs: Vec<(String, Source)>) -> (LoadTicket, LoadPlan) {
        self.generation += 1;
        self.state.loading = true;
        self.state.status = LoadStatus::Loading;

        let ticket = LoadTicket {
            generation: self.generation,
            origin,
        };
        let plan = LoadPlan {
            origin,
            loader: self.loader.clone(),
            universe: self.universe.clone(),
            jobs,
            window: self.options.window,
            parallel: self.options.parallel,
        };
        debug!(generation = self.generation, ?origin, "load started");
        (ticket, plan)
    }

    /// Start loading every universe symbol from static sources.
    pub fn begin_static_load(&mut self) -> (LoadTicket, LoadPlan) {
        let jobs = self
            .universe
            .iter()
            .map(|s| (s.to_string(), Source::Static))
            .collect();
        self.begin(LoadOrigin::Static, jobs)
    }

    /// Start loading the registered uploads, in universe order.
    pub fn begin_upload_load(&mut self) -> (LoadTicket, LoadPlan) {
        let jobs = self
            .universe
            .iter()
            .filter_map(|s| {
                self.state
                    .uploads
                    .get(s)
                    .map(|f| (s.to_string(), Source::Upload(Arc::clone(f))))
            })
            .collect();
        self.begin(LoadOrigin::Uploads, jobs)
    }

    /// Apply a finished load. Returns `false` and leaves state untouched if
    /// a newer load has started since `ticket` was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> bool {
        if ticket.generation != self.generation {
            warn!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale load result"
            );
            return false;
        }

        let loaded = outcome.loaded.len();
        let attempted = outcome.attempted;
        self.state.loading = false;

        if loaded == 0 {
            self.state.data = self.fallback_table();
            self.state.error = Some(SessionNotice::no_data(ticket.origin, attempted));
            self.state.status = LoadStatus::Fallback;
            warn!(attempted, "no data loaded, using fallback data");
        } else if loaded < attempted {
            self.state.data = outcome.table;
            self.state.error = Some(SessionNotice::partial(ticket.origin, loaded, attempted));
            self.state.status = LoadStatus::ReadyWithWarning;
            info!(loaded, attempted, rows = self.state.data.len(), "partial data loaded");
        } else {
            self.state.data = outcome.table;
            self.state.error = None;
            self.state.status = LoadStatus::Ready;
            info!(loaded, rows = self.state.data.len(), "all data loaded");
        }

        true
    }

    /// Startup pipeline: load every symbol from static sources.
    pub async fn load_static(&mut self) -> LoadStatus {
        let (ticket, plan) = self.begin_static_load();
        let outcome = plan.execute().await;
        self.finish_load(ticket, outcome);
        self.state.status
    }

    /// Set (`Some`) or remove (`None`) the upload for a symbol.
    ///
    /// Does not reprocess; call [`on_uploads_changed`](Self::on_uploads_changed)
    /// once the registry is in the desired shape.
    pub fn handle_file_upload(
        &mut self,
        symbol: &str,
        file: Option<Arc<dyn UploadFile>>,
    ) -> Result<(), SessionError> {
        let idx = self
            .universe
            .position(symbol)
            .ok_or_else(|| SessionError::UnknownSymbol(symbol.to_string()))?;
        let canonical = self.universe.symbols()[idx].clone();

        match file {
            Some(f) => {
                debug!(symbol = %canonical, file = f.name(), "upload registered");
                self.state.uploads.set(&canonical, f);
            }
            None => {
                debug!(symbol = %canonical, "upload removed");
                self.state.uploads.remove(&canonical);
            }
        }
        Ok(())
    }

    /// Reprocess the registered uploads. An empty registry shows fallback
    /// data without a notice.
    pub async fn on_uploads_changed(&mut self) -> LoadStatus {
        if self.state.uploads.is_empty() {
            self.seed_fallback();
            return self.state.status;
        }

        let (ticket, plan) = self.begin_upload_load();
        let outcome = plan.execute().await;
        self.finish_load(ticket, outcome);
        self.state.status
    }

    /// Drop every upload and show fresh fallback data. Synchronous; never
    /// enters the loading state.
    pub fn clear_files(&mut self) {
        self.state.uploads.clear();
        self.seed_fallback();
        info!("uploads cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NoticeKind;
    use async_trait::async_trait;
    use quantfolio_core::error::SourceError;
    use quantfolio_core::traits::ContentFetcher;
    use quantfolio_data::{MemoryFetcher, MemoryFile, FALLBACK_ROWS};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn csv(days: &[u32], base: f64) -> String {
        let mut s = String::from("Date,Close\n");
        for d in days {
            s.push_str(&format!("2024-01-{:02},{}\n", d, base + *d as f64));
        }
        s
    }

    fn controller(fetcher: impl ContentFetcher + 'static, universe: SymbolUniverse) -> SessionController {
        let fallback = FallbackGenerator::new(universe.clone());
        SessionController::new(
            universe,
            SourceLoader::new(Arc::new(fetcher)),
            fallback,
            SessionOptions {
                fallback_seed: Some(42),
                ..SessionOptions::default()
            },
        )
    }

    fn all_static() -> MemoryFetcher {
        let mut fetcher = MemoryFetcher::new();
        for (i, s) in SymbolUniverse::default().iter().enumerate() {
            fetcher.insert(format!("{}.csv", s), csv(&[2, 3, 4], 100.0 * (i + 1) as f64));
        }
        fetcher
    }

    #[tokio::test]
    async fn test_startup_all_loaded() {
        let mut ctl = controller(all_static(), SymbolUniverse::default());
        assert_eq!(ctl.state().status, LoadStatus::Idle);

        let status = ctl.load_static().await;

        assert_eq!(status, LoadStatus::Ready);
        let state = ctl.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.data.len(), 3);
        assert_eq!(state.data.rows[0].price("AAPL"), Some(102.0));
        assert_eq!(state.data.rows[2].price("META"), Some(704.0));
    }

    #[tokio::test]
    async fn test_startup_partial() {
        let fetcher = MemoryFetcher::new()
            .with_file("aapl.csv", csv(&[2, 3], 100.0))
            .with_file("MSFT_daily.csv", csv(&[3, 4], 200.0));
        let mut ctl = controller(fetcher, SymbolUniverse::default());

        let status = ctl.load_static().await;

        assert_eq!(status, LoadStatus::ReadyWithWarning);
        let state = ctl.state();
        let notice = state.error.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::PartialData { loaded: 2, attempted: 7 });
        assert_eq!(notice.message, "Loaded data for 2 of 7 stocks.");
        assert_eq!(state.data.len(), 3);
        assert_eq!(state.data.rows[0].price("MSFT"), None);
        assert_eq!(state.data.rows[2].price("AAPL"), None);
        assert!(state.data.rows.iter().all(|r| r.price("TSLA").is_none()));
    }

    #[tokio::test]
    async fn test_startup_total_failure_uses_fallback() {
        let mut ctl = controller(MemoryFetcher::new(), SymbolUniverse::default());

        let status = ctl.load_static().await;

        assert_eq!(status, LoadStatus::Fallback);
        let state = ctl.state();
        assert_eq!(
            state.error.as_ref().unwrap().kind,
            NoticeKind::NoDataLoaded { attempted: 7 }
        );
        assert_eq!(state.data.len(), FALLBACK_ROWS);
        for row in &state.data.rows {
            for symbol in ctl.universe().iter() {
                assert!(row.price(symbol).unwrap() > 0.0);
            }
        }
    }

    #[tokio::test]
    async fn test_upload_pipeline() {
        let mut ctl = controller(MemoryFetcher::new(), SymbolUniverse::default());
        ctl.seed_fallback();
        assert_eq!(ctl.state().status, LoadStatus::Fallback);

        ctl.handle_file_upload("nvda", Some(Arc::new(MemoryFile::new("n.csv", csv(&[5], 400.0)))))
            .unwrap();
        ctl.handle_file_upload("TSLA", Some(Arc::new(MemoryFile::new("t.csv", "garbage"))))
            .unwrap();
        assert_eq!(ctl.state().uploads.len(), 2);

        let status = ctl.on_uploads_changed().await;
        assert_eq!(status, LoadStatus::ReadyWithWarning);
        assert_eq!(ctl.state().data.len(), 1);
        assert_eq!(ctl.state().data.rows[0].price("NVDA"), Some(405.0));
        assert_eq!(
            ctl.state().error.as_ref().unwrap().message,
            "Loaded 1 of 2 uploaded files."
        );

        ctl.handle_file_upload("TSLA", None).unwrap();
        assert_eq!(ctl.on_uploads_changed().await, LoadStatus::Ready);
        assert!(ctl.state().error.is_none());
    }

    #[tokio::test]
    async fn test_upload_total_failure_and_unknown_symbol() {
        let mut ctl = controller(MemoryFetcher::new(), SymbolUniverse::default());

        ctl.handle_file_upload("AAPL", Some(Arc::new(MemoryFile::new("a.csv", "Foo,Bar\n1,2"))))
            .unwrap();
        assert_eq!(ctl.on_uploads_changed().await, LoadStatus::Fallback);
        assert_eq!(
            ctl.state().error.as_ref().unwrap().kind,
            NoticeKind::NoDataLoaded { attempted: 1 }
        );

        let err = ctl
            .handle_file_upload("BTC", Some(Arc::new(MemoryFile::new("b.csv", ""))))
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownSymbol("BTC".into()));
    }

    #[tokio::test]
    async fn test_clear_files() {
        let mut ctl = controller(MemoryFetcher::new(), SymbolUniverse::default());
        ctl.handle_file_upload("AAPL", Some(Arc::new(MemoryFile::new("a.csv", csv(&[2], 1.0)))))
            .unwrap();
        ctl.on_uploads_changed().await;
        assert_eq!(ctl.state().status, LoadStatus::Ready);

        ctl.clear_files();

        let state = ctl.state();
        assert!(state.uploads.is_empty());
        assert!(state.error.is_none());
        assert!(!state.loading);
        assert_eq!(state.status, LoadStatus::Fallback);
        assert_eq!(state.data.len(), FALLBACK_ROWS);
    }

    #[tokio::test]
    async fn test_empty_registry_falls_back_without_notice() {
        let mut ctl = controller(MemoryFetcher::new(), SymbolUniverse::default());
        assert_eq!(ctl.on_uploads_changed().await, LoadStatus::Fallback);
        assert!(ctl.state().error.is_none());
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let fetcher = MemoryFetcher::new().with_file("AAPL.csv", csv(&[2], 100.0));
        let mut ctl = controller(fetcher, SymbolUniverse::new(["AAPL"]));

        let (old_ticket, old_plan) = ctl.begin_static_load();
        ctl.handle_file_upload("AAPL", Some(Arc::new(MemoryFile::new("a.csv", csv(&[9], 500.0)))))
            .unwrap();
        let (new_ticket, new_plan) = ctl.begin_upload_load();
        assert!(ctl.state().loading);

        let (old_outcome, new_outcome) = tokio::join!(old_plan.execute(), new_plan.execute());

        assert!(ctl.finish_load(new_ticket, new_outcome));
        assert!(!ctl.finish_load(old_ticket, old_outcome));

        let state = ctl.state();
        assert!(!state.loading);
        assert_eq!(state.status, LoadStatus::Ready);
        assert_eq!(state.data.rows[0].price("AAPL"), Some(509.0));
    }

    #[tokio::test]
    async fn test_clear_invalidates_in_flight_load() {
        let mut ctl = controller(all_static(), SymbolUniverse::default());
        let (ticket, plan) = ctl.begin_static_load();
        ctl.clear_files();

        let outcome = plan.execute().await;
        assert!(!ctl.finish_load(ticket, outcome));
        assert_eq!(ctl.state().status, LoadStatus::Fallback);
    }

    /// Responds after a per-path delay and counts calls in flight.
    struct SlowFetcher {
        inner: MemoryFetcher,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ContentFetcher for SlowFetcher {
        async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let delay = if path.starts_with('A') { 30 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inner.fetch_text(path).await
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let universe = SymbolUniverse::default();
        let make = |parallel: bool| {
            let fetcher = Arc::new(SlowFetcher {
                inner: all_static(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            });
            let ctl = SessionController::new(
                universe.clone(),
                SourceLoader::new(fetcher.clone()).with_patterns(vec!["{SYMBOL}.csv".into()]),
                FallbackGenerator::new(universe.clone()),
                SessionOptions {
                    parallel,
                    fallback_seed: Some(1),
                    ..SessionOptions::default()
                },
            );
            (ctl, fetcher)
        };

        let (mut sequential, seq_fetcher) = make(false);
        let (mut parallel, par_fetcher) = make(true);
        assert_eq!(sequential.load_static().await, LoadStatus::Ready);
        assert_eq!(parallel.load_static().await, LoadStatus::Ready);

        assert_eq!(sequential.state().data, parallel.state().data);
        assert_eq!(seq_fetcher.peak.load(Ordering::SeqCst), 1);
        assert!(par_fetcher.peak.load(Ordering::SeqCst) > 1);
    }
}
