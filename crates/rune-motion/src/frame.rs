//! Frame-phase job scheduling.
//!
//! Work is batched per frame into four ordered phases. Jobs scheduled while a
//! frame is running (from inside another job, or from another thread holding a
//! [`FrameScheduler`]) are queued for the next frame, never the current one.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Frame phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Observe values before this frame's writes.
    Read,
    /// Advance animations and write stores.
    Update,
    /// Collect and apply host-visible styles.
    Render,
    /// Runs after rendering; good for follow-up input.
    PostRender,
}

impl Phase {
    pub const ALL: [Self; 4] = [Self::Read, Self::Update, Self::Render, Self::PostRender];

    const fn index(self) -> usize {
        match self {
            Self::Read => 0,
            Self::Update => 1,
            Self::Render => 2,
            Self::PostRender => 3,
        }
    }
}

/// Timing information for the running frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameData {
    /// Frame counter, starting at 1 for the first tick.
    pub index: u64,
    /// Time since the previous frame in milliseconds.
    pub delta_ms: f32,
    /// Sum of all deltas so far in milliseconds.
    pub timestamp_ms: f64,
}

/// A job run once in a given phase.
pub type FrameJob = Box<dyn FnOnce(&FrameData) + Send>;

type Queues = [Vec<FrameJob>; 4];

/// Cloneable handle for scheduling jobs.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    queues: Arc<Mutex<Queues>>,
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queues = self.queues.lock();
        f.debug_struct("FrameScheduler")
            .field("queued", &queues.iter().map(Vec::len).collect::<Vec<_>>())
            .finish()
    }
}

impl FrameScheduler {
    /// Queue a job for the next time `phase` runs.
    pub fn schedule(&self, phase: Phase, job: impl FnOnce(&FrameData) + Send + 'static) {
        self.queues.lock()[phase.index()].push(Box::new(job));
    }

    /// Number of jobs waiting for a phase.
    pub fn pending(&self, phase: Phase) -> usize {
        self.queues.lock()[phase.index()].len()
    }
}

/// Jobs captured for one frame.
pub struct FrameBatch {
    jobs: Queues,
    data: FrameData,
}

impl FrameBatch {
    pub fn data(&self) -> &FrameData {
        &self.data
    }

    /// Run this frame's jobs for a phase.
    pub fn run(&mut self, phase: Phase) {
        for job in std::mem::take(&mut self.jobs[phase.index()]) {
            job(&self.data);
        }
    }
}

/// Frame counter plus the job queues.
#[derive(Debug, Default)]
pub struct FrameLoop {
    scheduler: FrameScheduler,
    data: FrameData,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduler(&self) -> FrameScheduler {
        self.scheduler.clone()
    }

    /// Data of the most recent frame.
    pub fn last_frame(&self) -> FrameData {
        self.data
    }

    /// Start a frame: take every queued job. Later schedules wait for the next frame.
    pub fn begin(&mut self, delta_ms: f32) -> FrameBatch {
        self.data = FrameData {
            index: self.data.index + 1,
            delta_ms,
            timestamp_ms: self.data.timestamp_ms + f64::from(delta_ms),
        };
        let jobs = std::mem::take(&mut *self.scheduler.queues.lock());
        FrameBatch {
            jobs,
            data: self.data,
        }
    }
}
