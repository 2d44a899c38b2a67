// eglport/src/frame_counter.rs
//
//! Frames-per-second reporting.

use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Counts presented frames and reports the rate once per elapsed second.
#[derive(Clone, Debug)]
pub struct FrameCounter {
    frames: u32,
    since: Instant,
}

impl FrameCounter {
    #[inline]
    pub fn new() -> FrameCounter {
        FrameCounter::starting_at(Instant::now())
    }

    #[inline]
    pub fn starting_at(now: Instant) -> FrameCounter {
        FrameCounter { frames: 0, since: now }
    }

    /// Records a frame presented at `now`. Once a second has passed since the last report, logs
    /// and returns the number of frames counted, then starts counting again.
    pub fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.saturating_duration_since(self.since) < REPORT_INTERVAL {
            return None;
        }
        let fps = self.frames;
        info!("{} fps", fps);
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}

impl Default for FrameCounter {
    fn default() -> FrameCounter {
        FrameCounter::new()
    }
}
