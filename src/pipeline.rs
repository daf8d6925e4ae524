use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::client::RecipeSource;
use crate::config::DetailFailure;
use crate::input;
use crate::model::{RecipeCard, SearchResult};
use crate::render::OutputSink;
use crate::FinderError;

/// Warning raised when the search stage fails.
pub const SEARCH_FAILED_WARNING: &str = "Error fetching recipes. Please try again later.";

/// Placeholder shown when a search yields no candidates.
pub const NO_RECIPES_MESSAGE: &str = "No recipes found. Try different ingredients!";

/// How a stage recovers from a failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePolicy {
    /// Warn the user and continue as if nothing was found
    WarnAndEmpty,
    /// Drop the affected candidate, tell nobody
    SkipCandidate,
    /// Render a "details unavailable" card for the affected candidate
    PlaceholderCard,
}

impl From<DetailFailure> for StagePolicy {
    fn from(value: DetailFailure) -> Self {
        match value {
            DetailFailure::Skip => StagePolicy::SkipCandidate,
            DetailFailure::Placeholder => StagePolicy::PlaceholderCard,
        }
    }
}

/// A named pipeline stage and its failure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    pub policy: StagePolicy,
}

impl Stage {
    pub const SEARCH: Stage = Stage {
        name: "search",
        policy: StagePolicy::WarnAndEmpty,
    };

    pub const fn details(policy: StagePolicy) -> Stage {
        Stage {
            name: "details",
            policy,
        }
    }
}

/// Where a finder is in its run cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Loading = 1,
    Empty = 2,
    Populated = 3,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RunState::Loading,
            2 => RunState::Empty,
            3 => RunState::Populated,
            _ => RunState::Idle,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run was still in flight; nothing was done
    Busy,
    /// The input was empty; no request was made
    Rejected,
    /// The search produced no candidates
    Empty,
    /// Cards were rendered for the candidates whose details arrived
    Populated { cards: usize, dropped: usize },
}

/// Validates input, searches, fetches details one by one and renders cards.
pub struct RecipeFinder {
    source: Box<dyn RecipeSource>,
    limit: u32,
    recipe_base_url: String,
    search_stage: Stage,
    details_stage: Stage,
    in_flight: AtomicBool,
    state: AtomicU8,
}

/// Holds the run slot. If the run future is dropped midway the indicator is
/// hidden and the finder goes back to idle.
struct RunGuard<'a, 's> {
    finder: &'a RecipeFinder,
    sink: &'a mut (dyn OutputSink + Send + 's),
}

impl Drop for RunGuard<'_, '_> {
    fn drop(&mut self) {
        if self.finder.state() == RunState::Loading {
            self.finder.set_state(RunState::Idle);
            self.sink.hide_loading();
        }
        self.finder.in_flight.store(false, Ordering::Release);
    }
}

impl RecipeFinder {
    pub fn new(
        source: Box<dyn RecipeSource>,
        limit: u32,
        recipe_base_url: impl Into<String>,
        detail_policy: StagePolicy,
    ) -> Self {
        Self {
            source,
            limit,
            recipe_base_url: recipe_base_url.into(),
            search_stage: Stage::SEARCH,
            details_stage: Stage::details(detail_policy),
            in_flight: AtomicBool::new(false),
            state: AtomicU8::new(RunState::Idle as u8),
        }
    }

    /// Creates a new builder for a recipe finder
    pub fn builder() -> crate::builder::RecipeFinderBuilder {
        crate::builder::RecipeFinderBuilder::default()
    }

    /// `Loading` while a run is in flight, then the outcome of the last
    /// run (`Empty`, `Populated`, or `Idle` after a rejected or cancelled
    /// run) until the next one starts.
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True while a run is in flight
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn details_stage(&self) -> Stage {
        self.details_stage
    }

    fn set_state(&self, state: RunState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Run the whole pipeline for one user action.
    ///
    /// Only one run may be in flight per finder; a second trigger while one
    /// is running returns [`RunOutcome::Busy`] without touching the sink.
    pub async fn run(&self, raw: &str, sink: &mut (dyn OutputSink + Send)) -> RunOutcome {
        if !self.try_begin() {
            debug!("Ignoring trigger while a run is in flight");
            return RunOutcome::Busy;
        }
        let mut guard = RunGuard { finder: self, sink };

        self.set_state(RunState::Loading);
        guard.sink.show_loading();
        let outcome = self.run_stages(raw, &mut *guard.sink).await;
        self.set_state(match outcome {
            RunOutcome::Empty => RunState::Empty,
            RunOutcome::Populated { .. } => RunState::Populated,
            RunOutcome::Busy | RunOutcome::Rejected => RunState::Idle,
        });
        guard.sink.hide_loading();
        drop(guard);

        info!("Run finished: {:?}", outcome);
        outcome
    }

    async fn run_stages(&self, raw: &str, sink: &mut (dyn OutputSink + Send)) -> RunOutcome {
        let query = match input::validate(raw) {
            Ok(query) => query,
            Err(e) => {
                sink.warn(&e.to_string());
                return RunOutcome::Rejected;
            }
        };

        let candidates = self.search(query.as_str(), sink).await;

        sink.clear();
        if candidates.is_empty() {
            sink.show_message(NO_RECIPES_MESSAGE);
            return RunOutcome::Empty;
        }

        let mut cards = 0;
        let mut dropped = 0;
        for candidate in &candidates {
            match self.card_for(candidate).await {
                Some(card) => {
                    sink.append(&card);
                    cards += 1;
                }
                None => dropped += 1,
            }
        }

        RunOutcome::Populated { cards, dropped }
    }

    async fn search(
        &self,
        query: &str,
        sink: &mut (dyn OutputSink + Send),
    ) -> Vec<SearchResult> {
        match self.source.search(query, self.limit).await {
            Ok(mut candidates) => {
                if candidates.len() > self.limit as usize {
                    debug!(
                        "Search returned {} candidates, keeping the first {}",
                        candidates.len(),
                        self.limit
                    );
                    candidates.truncate(self.limit as usize);
                }
                debug!("Search for {:?} found {} candidates", query, candidates.len());
                candidates
            }
            Err(e) => {
                self.recover(self.search_stage, &e, sink);
                Vec::new()
            }
        }
    }

    async fn card_for(&self, candidate: &SearchResult) -> Option<RecipeCard> {
        match self.source.details(candidate.id).await {
            Ok(detail) => Some(RecipeCard::new(candidate, &detail, &self.recipe_base_url)),
            Err(e) => {
                warn!(
                    "{} stage failed for recipe {}: {}",
                    self.details_stage.name, candidate.id, e
                );
                match self.details_stage.policy {
                    StagePolicy::PlaceholderCard => Some(RecipeCard::unavailable(
                        candidate,
                        &self.recipe_base_url,
                    )),
                    StagePolicy::SkipCandidate | StagePolicy::WarnAndEmpty => None,
                }
            }
        }
    }

    fn recover(
        &self,
        stage: Stage,
        error: &FinderError,
        sink: &mut (dyn OutputSink + Send),
    ) {
        warn!("{} stage failed: {}", stage.name, error);
        if stage.policy == StagePolicy::WarnAndEmpty {
            sink.warn(SEARCH_FAILED_WARNING);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecipeDetail;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    struct StubSource {
        results: Vec<SearchResult>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RecipeSource for StubSource {
        async fn search(
            &self,
            _ingredients: &str,
            _limit: u32,
        ) -> Result<Vec<SearchResult>, FinderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }

        async fn details(&self, _recipe_id: u64) -> Result<RecipeDetail, FinderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RecipeDetail {
                instructions: Some("Cook.".to_string()),
            })
        }
    }

    #[derive(Default)]
    struct CountingSink {
        cards: usize,
        warnings: usize,
        loading: bool,
    }

    impl OutputSink for CountingSink {
        fn show_loading(&mut self) {
            self.loading = true;
        }
        fn hide_loading(&mut self) {
            self.loading = false;
        }
        fn clear(&mut self) {
            self.cards = 0;
        }
        fn append(&mut self, _card: &RecipeCard) {
            self.cards += 1;
        }
        fn show_message(&mut self, _message: &str) {}
        fn warn(&mut self, _message: &str) {
            self.warnings += 1;
        }
    }

    fn candidate(id: u64) -> SearchResult {
        SearchResult {
            id,
            title: format!("Recipe {}", id),
            image: format!("{}.jpg", id),
            used_ingredient_count: None,
            missed_ingredient_count: None,
        }
    }

    #[test]
    fn test_detail_failure_maps_to_policy() {
        assert_eq!(
            StagePolicy::from(DetailFailure::Skip),
            StagePolicy::SkipCandidate
        );
        assert_eq!(
            StagePolicy::from(DetailFailure::Placeholder),
            StagePolicy::PlaceholderCard
        );
        assert_eq!(Stage::SEARCH.policy, StagePolicy::WarnAndEmpty);
    }

    #[tokio::test]
    async fn test_rejected_input_makes_no_calls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let finder = RecipeFinder::new(
            Box::new(StubSource {
                results: vec![candidate(1)],
                calls: calls.clone(),
            }),
            5,
            "https://spoonacular.com/recipes",
            StagePolicy::SkipCandidate,
        );
        let mut sink = CountingSink::default();

        assert_eq!(finder.run("   ", &mut sink).await, RunOutcome::Rejected);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.warnings, 1);
        assert!(!sink.loading);
        assert_eq!(finder.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_results_beyond_limit_are_not_rendered() {
        let calls = Arc::new(AtomicUsize::new(0));
        let finder = RecipeFinder::new(
            Box::new(StubSource {
                results: (1..=8).map(candidate).collect(),
                calls,
            }),
            5,
            "https://spoonacular.com/recipes",
            StagePolicy::SkipCandidate,
        );
        let mut sink = CountingSink::default();

        let outcome = finder.run("eggs", &mut sink).await;
        assert_eq!(
            outcome,
            RunOutcome::Populated {
                cards: 5,
                dropped: 0
            }
        );
        assert_eq!(sink.cards, 5);
    }

    fn stub_finder(results: Vec<SearchResult>) -> RecipeFinder {
        RecipeFinder::new(
            Box::new(StubSource {
                results,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            5,
            "https://spoonacular.com/recipes",
            StagePolicy::SkipCandidate,
        )
    }

    #[tokio::test]
    async fn test_state_reports_last_outcome() {
        let mut sink = CountingSink::default();

        let empty = stub_finder(Vec::new());
        assert_eq!(empty.state(), RunState::Idle);
        assert_eq!(empty.run("gravel", &mut sink).await, RunOutcome::Empty);
        assert_eq!(empty.state(), RunState::Empty);
        assert!(!empty.is_running());

        let populated = stub_finder(vec![candidate(1), candidate(2)]);
        populated.run("eggs", &mut sink).await;
        assert_eq!(populated.state(), RunState::Populated);

        // a rejected trigger leaves the finder idle again
        populated.run("  ", &mut sink).await;
        assert_eq!(populated.state(), RunState::Idle);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn test_run_future_is_send() {
        let finder = stub_finder(vec![candidate(1)]);
        let mut sink = CountingSink::default();
        let run = finder.run("eggs", &mut sink);
        assert_send(&run);
    }
}
