//! Analyzing Ticker
//!
//! Stage messages and a progress percentage shown while the
//! recommendation is being prepared. Purely cosmetic.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How often the front end should call `tick`
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Ticks per stage message
const TICKS_PER_STAGE: u32 = 4;

const STAGES: [&str; 6] = [
    "Processing your answers...",
    "Estimating your basal metabolic rate...",
    "Identifying dietary restrictions...",
    "Mapping your behavioral profile...",
    "Building your personalized strategy...",
    "Finalizing your diagnosis...",
];

/// Range of the random progress increment per tick
const MIN_STEP: u8 = 2;
const MAX_STEP: u8 = 9;

/// One frame of the ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerFrame {
    pub progress: u8,
    pub stage: &'static str,
}

#[derive(Debug, Clone)]
pub struct AnalyzingTicker {
    ticks: u32,
    progress: u8,
    rng: StdRng,
}

impl Default for AnalyzingTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzingTicker {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible ticker
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            ticks: 0,
            progress: 0,
            rng,
        }
    }

    pub fn frame(&self) -> TickerFrame {
        let stage = if self.ticks < TICKS_PER_STAGE {
            STAGES[0]
        } else {
            // After the opening message the remaining stages rotate
            let rotating = &STAGES[1..];
            let index = ((self.ticks / TICKS_PER_STAGE - 1) as usize) % rotating.len();
            rotating[index]
        };
        TickerFrame {
            progress: self.progress,
            stage,
        }
    }

    /// Advance one tick. Progress never decreases and never passes 100.
    pub fn tick(&mut self) -> TickerFrame {
        let step = self.rng.gen_range(MIN_STEP..=MAX_STEP);
        self.progress = self.progress.saturating_add(step).min(100);
        self.ticks = self.ticks.saturating_add(1);
        self.frame()
    }

    /// Jump to 100%
    pub fn finish(&mut self) -> TickerFrame {
        self.progress = 100;
        self.frame()
    }
}
