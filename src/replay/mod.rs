//! Replay animator: shows the candles before the buy point at once, then reveals the
//! buy..=sell slice one candle per tick.

mod driver;

pub use driver::{CancelToken, ReplayHandle, ReplaySink};

use crate::core::{Candle, TvError};

/// Buy and sell positions inside a candle sequence. `buy <= sell < len` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayPlan {
    buy_index: usize,
    sell_index: usize,
}

impl ReplayPlan {
    /// # Errors
    ///
    /// Returns [`TvError::Plan`] unless `buy_index <= sell_index < len`.
    pub fn new(buy_index: usize, sell_index: usize, len: usize) -> Result<Self, TvError> {
        if buy_index > sell_index {
            return Err(TvError::Plan(format!(
                "buy index {buy_index} is after sell index {sell_index}"
            )));
        }
        if sell_index >= len {
            return Err(TvError::Plan(format!(
                "sell index {sell_index} is outside {len} candles"
            )));
        }
        Ok(Self {
            buy_index,
            sell_index,
        })
    }

    /// Positions counted back from the end: `buy = len - buy_offset`, `sell = len - sell_offset`.
    ///
    /// # Errors
    ///
    /// Returns [`TvError::Plan`] when the data is too short for the offsets.
    pub fn from_offsets(len: usize, buy_offset: usize, sell_offset: usize) -> Result<Self, TvError> {
        let back = |offset: usize| {
            len.checked_sub(offset).ok_or_else(|| {
                TvError::Plan(format!("offset {offset} exceeds {len} candles"))
            })
        };
        Self::new(back(buy_offset)?, back(sell_offset)?, len)
    }

    pub fn buy_index(&self) -> usize {
        self.buy_index
    }

    pub fn sell_index(&self) -> usize {
        self.sell_index
    }

    /// Number of candles revealed one per tick.
    pub fn slice_len(&self) -> usize {
        self.sell_index - self.buy_index + 1
    }
}

/// Result of one timer tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Candles to append, in order. The final reveal also carries the tail after the sell index.
    Reveal(Vec<Candle>),
    Finished,
}

/// Replay state over an immutable candle sequence.
#[derive(Debug, Clone)]
pub struct Replay {
    candles: Vec<Candle>,
    plan: ReplayPlan,
    revealed: usize,
}

impl Replay {
    pub fn new(candles: Vec<Candle>, plan: ReplayPlan) -> Self {
        Self {
            candles,
            plan,
            revealed: 0,
        }
    }

    pub fn plan(&self) -> ReplayPlan {
        self.plan
    }

    /// Candles rendered statically before the first tick.
    pub fn initial(&self) -> &[Candle] {
        &self.candles[..self.plan.buy_index]
    }

    /// Slice candles revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_finished(&self) -> bool {
        self.revealed >= self.plan.slice_len()
    }

    pub fn tick(&mut self) -> Tick {
        if self.is_finished() {
            return Tick::Finished;
        }
        let idx = self.plan.buy_index + self.revealed;
        self.revealed += 1;
        let end = if self.is_finished() {
            self.candles.len()
        } else {
            idx + 1
        };
        Tick::Reveal(self.candles[idx..end].to_vec())
    }
}
