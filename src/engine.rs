// The engine state machine: Idle --begin--> Running --end--> Idle.
// Duplicate begin/end are absorbed by the guards; there is no pause/resume.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::animation;
use crate::command::Command;
use crate::discovery;
use crate::host::PageHost;
use crate::record::ElementRecord;
use crate::restore;
use crate::types::*;

/// State owned by one engine instance.
#[derive(Debug)]
pub enum EngineState<E> {
    Idle,
    Running(ActiveRun<E>),
}

/// Everything that lives only between a processed begin and a processed end.
#[derive(Debug)]
pub struct ActiveRun<E> {
    /// Set on the first frame after begin.
    pub start_time: Option<FrameTime>,
    pub frame: Option<FrameHandle>,
    pub working_set: Vec<ElementRecord<E>>,
}

/// Animation engine bound to one page host.
pub struct Engine<H: PageHost> {
    host: H,
    config: EngineConfig,
    rng: StdRng,
    state: EngineState<H::Element>,
    /// Transition cleanup of the last run, while its timer is armed.
    pending_cleanup: Option<CleanupHandle>,
}

impl<H: PageHost> Engine<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        Self::with_rng(host, config, StdRng::from_entropy())
    }

    pub fn with_rng(host: H, config: EngineConfig, rng: StdRng) -> Self {
        Engine {
            host,
            config,
            rng,
            state: EngineState::Idle,
            pending_cleanup: None,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        match self.state {
            EngineState::Idle => EnginePhase::Idle,
            EngineState::Running(_) => EnginePhase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase() == EnginePhase::Running
    }

    pub fn state(&self) -> &EngineState<H::Element> {
        &self.state
    }

    /// Elements currently animated. Empty while idle.
    pub fn working_set(&self) -> &[ElementRecord<H::Element>] {
        match &self.state {
            EngineState::Idle => &[],
            EngineState::Running(run) => &run.working_set,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Begin => self.begin(),
            Command::End => self.end(),
        }
    }

    /// Snapshot the page and start the frame loop. Returns false if already running.
    pub fn begin(&mut self) -> bool {
        if self.is_running() {
            debug!("begin ignored, already running");
            return false;
        }

        // The previous snap-back transition must be gone before anything is captured.
        self.flush_pending_cleanup();

        let working_set = discovery::discover(&self.host, &self.config, &mut self.rng);
        discovery::prepare(&working_set);

        let frame = match self.host.request_frame() {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(%err, "could not request first animation frame");
                None
            }
        };

        info!(elements = working_set.len(), "hallucination started");
        self.state = EngineState::Running(ActiveRun {
            start_time: None,
            frame,
            working_set,
        });
        true
    }

    /// Frame callback. Writes one frame and requests exactly one more; does nothing while idle.
    pub fn on_frame(&mut self, now: FrameTime) {
        let EngineState::Running(run) = &mut self.state else {
            return;
        };

        run.frame = None;
        let start = *run.start_time.get_or_insert(now);
        animation::apply_frame(&run.working_set, now.secs_since(start));

        match self.host.request_frame() {
            Ok(handle) => run.frame = Some(handle),
            Err(err) => warn!(%err, "animation loop stopped, could not request next frame"),
        }
    }

    /// Stop the frame loop and restore the page. Returns false if already idle.
    pub fn end(&mut self) -> bool {
        let EngineState::Running(run) = std::mem::replace(&mut self.state, EngineState::Idle)
        else {
            debug!("end ignored, not running");
            return false;
        };

        if let Some(handle) = run.frame {
            self.host.cancel_frame(handle);
        }

        let count = run.working_set.len();
        self.pending_cleanup =
            restore::restore(&mut self.host, run.working_set, self.config.cleanup_delay());
        info!(elements = count, "hallucination stopped");
        true
    }

    fn flush_pending_cleanup(&mut self) {
        let Some(handle) = self.pending_cleanup.take() else {
            return;
        };
        if let Some(cleanup) = self.host.cancel_cleanup(handle) {
            debug!(elements = cleanup.len(), "running previous cleanup early");
            cleanup.run();
        }
    }
}

impl<H: PageHost> Drop for Engine<H> {
    /// A running engine restores the page when it goes away.
    fn drop(&mut self) {
        self.end();
    }
}
