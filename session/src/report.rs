use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use futures::StreamExt;
use tracing::{debug, warn};
use valdeck_shared::traits::ReportApi;

/// Shown in place of the report whenever the stream fails, before or after
/// text started arriving.
pub const REPORT_FAILURE_TEXT: &str = "Failed to generate report. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPhase {
    #[default]
    Idle,
    Streaming,
    Done,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ReportState {
    pub phase: ReportPhase,
    pub text: String,
}

/// Consumes the streamed AI report and exposes the text as it arrives.
pub struct ReportSession {
    api: Arc<dyn ReportApi>,
    state: Mutex<ReportState>,
    generation: AtomicU64,
}

impl ReportSession {
    pub fn new(api: Arc<dyn ReportApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            state: Mutex::new(ReportState::default()),
            generation: AtomicU64::new(0),
        })
    }

    pub fn state(&self) -> ReportState {
        self.lock_state().clone()
    }

    /// Stream a fresh report, appending chunks in arrival order. Restarting
    /// generation clears previous output and supersedes a stream still in
    /// flight.
    pub async fn generate(&self, puuid: String) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock_state();
            state.text.clear();
            state.phase = ReportPhase::Streaming;
        }

        let mut stream = match self.api.report_stream(puuid).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("report request failed: {e}");
                self.fail_if_current(generation);
                return;
            }
        };

        while let Some(piece) = stream.next().await {
            if !self.is_current(generation) {
                debug!("discarding superseded report stream");
                return;
            }
            match piece {
                Ok(chunk) => self.lock_state().text.push_str(&chunk),
                Err(e) => {
                    warn!("report stream interrupted: {e}");
                    self.fail_if_current(generation);
                    return;
                }
            }
        }

        if self.is_current(generation) {
            self.lock_state().phase = ReportPhase::Done;
        }
    }

    fn fail_if_current(&self, generation: u64) {
        if self.is_current(generation) {
            let mut state = self.lock_state();
            state.text = REPORT_FAILURE_TEXT.to_string();
            state.phase = ReportPhase::Failed;
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ReportState> {
        self.state.lock().expect("report state lock poisoned")
    }
}
