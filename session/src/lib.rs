//! View-state controller for the dashboard.
//!
//! [`DashboardSession`] owns the current screen and orchestrates the fetch
//! sequence feeding it. Every request failure is converted into local view
//! state here; nothing propagates out of a session operation as an error.
//!
//! Navigations are stamped with a generation counter so a response that
//! belongs to a superseded navigation can never overwrite the state of a
//! newer one.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use tracing::{debug, warn};
use valdeck_shared::{
    PlayerInfo, RiotId,
    stats::ProfileStats,
    traits::DashboardApiFull,
    val_match::{Match, MatchDetail},
};

pub use report::{REPORT_FAILURE_TEXT, ReportPhase, ReportSession, ReportState};

mod report;

pub const PLAYER_NOT_FOUND_MESSAGE: &str =
    "Player not found. Please check your Riot ID and Tagline.";
pub const LOOKUP_FAILED_MESSAGE: &str = "Failed to find player";
pub const INVALID_RIOT_ID_MESSAGE: &str = "Enter your Riot ID and Tagline separated by #";

/// Which screen is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    Profile,
}

/// Lifecycle of the match-detail overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailView {
    #[default]
    Closed,
    Loading,
    Open(MatchDetail),
    /// Terminal display after a failed detail fetch, no retry.
    NotFound,
}

/// Everything a renderer needs to draw the current frame.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub screen: Screen,
    pub searching: bool,
    pub search_error: Option<String>,
    pub player: Option<PlayerInfo>,
    pub matches: Vec<Match>,
    pub matches_loading: bool,
    pub detail: DetailView,
}

pub struct DashboardSession {
    api: Arc<dyn DashboardApiFull>,
    state: Mutex<ViewState>,
    /// Bumped on every profile-level navigation (search, back).
    generation: AtomicU64,
    /// Bumped on detail overlay transitions, and on navigations that also
    /// discard the overlay.
    detail_generation: AtomicU64,
}

impl DashboardSession {
    pub fn new(api: Arc<dyn DashboardApiFull>) -> Arc<Self> {
        Arc::new(Self {
            api,
            state: Mutex::new(ViewState::default()),
            generation: AtomicU64::new(0),
            detail_generation: AtomicU64::new(0),
        })
    }

    /// Snapshot of the current view state.
    pub fn state(&self) -> ViewState {
        self.lock_state().clone()
    }

    /// Aggregates over the currently displayed match list.
    pub fn profile_stats(&self) -> ProfileStats {
        ProfileStats::from_matches(&self.lock_state().matches)
    }

    /// Look a player up and enter their profile.
    ///
    /// Invalid riot ids are rejected locally without issuing a request. On
    /// lookup failure the session stays on the landing screen with an error
    /// message. Returns whether the profile screen was entered.
    pub async fn search(&self, input: &str) -> bool {
        let riot_id = match RiotId::parse(input) {
            Ok(id) => id,
            Err(e) => {
                debug!("rejected search input: {e}");
                let mut state = self.lock_state();
                state.search_error = Some(INVALID_RIOT_ID_MESSAGE.to_string());
                return false;
            }
        };

        let generation = self.bump_generation();
        self.bump_detail_generation();
        {
            let mut state = self.lock_state();
            state.searching = true;
            state.search_error = None;
        }

        debug!("looking up player {}", riot_id);
        let looked_up = self
            .api
            .get_player(riot_id.game_name.clone(), riot_id.tag_line.clone())
            .await;

        if !self.is_current(generation) {
            debug!("discarding superseded lookup for {}", riot_id);
            return false;
        }

        let player = match looked_up {
            Ok(player) => player,
            Err(e) => {
                warn!("player lookup failed: {e}");
                let message = if e.is_not_found() {
                    PLAYER_NOT_FOUND_MESSAGE
                } else {
                    LOOKUP_FAILED_MESSAGE
                };
                let mut state = self.lock_state();
                state.searching = false;
                state.search_error = Some(message.to_string());
                return false;
            }
        };

        self.enter_profile(player).await;
        true
    }

    /// Enter the profile screen for an already-resolved player and load
    /// their match history. Also reachable without a fresh lookup, e.g. for
    /// a bookmarked profile.
    pub async fn enter_profile(&self, player: PlayerInfo) {
        let generation = self.bump_generation();
        self.bump_detail_generation();

        let (region, puuid) = (player.region.clone(), player.puuid.clone());
        {
            let mut state = self.lock_state();
            state.searching = false;
            state.search_error = None;
            state.screen = Screen::Profile;
            state.player = Some(player);
            state.matches = Vec::new();
            state.detail = DetailView::Closed;
        }

        self.load_matches(generation, region, puuid).await;
    }

    /// Re-fetch the match list for the player currently on screen. Used by
    /// the update poller once a sync job completes.
    pub async fn refresh_matches(&self) {
        let Some((region, puuid)) = self
            .lock_state()
            .player
            .as_ref()
            .map(|p| (p.region.clone(), p.puuid.clone()))
        else {
            return;
        };

        let generation = self.generation.load(Ordering::SeqCst);
        self.load_matches(generation, region, puuid).await;
    }

    /// Fetch the full scoreboard for one history row. While the request is
    /// in flight the overlay shows a loading state; a failure leaves it in a
    /// terminal not-found display.
    pub async fn open_match(&self, match_id: String) {
        let generation = self.bump_detail_generation();
        self.lock_state().detail = DetailView::Loading;

        let fetched = self.api.get_match(match_id).await;

        if !self.is_current_detail(generation) {
            debug!("discarding match detail for a closed overlay");
            return;
        }

        self.lock_state().detail = match fetched {
            Ok(detail) => DetailView::Open(detail),
            Err(e) => {
                warn!("match detail fetch failed: {e}");
                DetailView::NotFound
            }
        };
    }

    pub fn close_match(&self) {
        self.bump_detail_generation();
        self.lock_state().detail = DetailView::Closed;
    }

    /// Leave the profile and discard everything attached to it.
    pub fn back_to_landing(&self) {
        self.bump_generation();
        self.bump_detail_generation();
        *self.lock_state() = ViewState::default();
    }

    async fn load_matches(&self, generation: u64, region: String, puuid: String) {
        if self.is_current(generation) {
            self.lock_state().matches_loading = true;
        }

        let fetched = self.api.get_matches(region, puuid).await;

        if !self.is_current(generation) {
            debug!("discarding stale match list response");
            return;
        }

        // An empty or failed history never blocks the profile screen.
        let matches = match fetched {
            Ok(matches) => matches,
            Err(e) => {
                warn!("match list fetch failed, showing empty history: {e}");
                Vec::new()
            }
        };

        let mut state = self.lock_state();
        state.matches = matches;
        state.matches_loading = false;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().expect("view state lock poisoned")
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn bump_detail_generation(&self) -> u64 {
        self.detail_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current_detail(&self, generation: u64) -> bool {
        self.detail_generation.load(Ordering::SeqCst) == generation
    }
}
