//! Linear vesting of the curation-reward pool.
//!
//! The pool unlocks linearly from the moment the token lists, over a fixed
//! number of equal eras. Vested amounts are computed multiply-then-divide so
//! exact era boundaries release exact pool fractions.

use slipway_types::{SlipwayError, SlipwayResult};

/// A linear vesting schedule anchored at listing time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingSchedule {
    /// Total units that vest over the schedule.
    pub pool: u128,
    /// Unix timestamp the schedule starts at.
    pub start: u64,
    /// Length of one era, seconds.
    pub era_seconds: u64,
    /// Number of eras.
    pub era_count: u32,
}

impl VestingSchedule {
    pub fn new(pool: u128, start: u64, era_seconds: u64, era_count: u32) -> Self {
        VestingSchedule {
            pool,
            start,
            era_seconds,
            era_count,
        }
    }

    /// Total schedule length in seconds.
    pub fn duration(&self) -> u64 {
        self.era_seconds.saturating_mul(u64::from(self.era_count))
    }

    /// Units vested at `now`, clipped to `[0, pool]`.
    pub fn vested_at(&self, now: u64) -> SlipwayResult<u128> {
        if now <= self.start {
            return Ok(0);
        }
        let duration = self.duration();
        if duration == 0 {
            return Ok(self.pool);
        }
        let elapsed = (now - self.start).min(duration);
        self.pool
            .checked_mul(u128::from(elapsed))
            .ok_or(SlipwayError::MathOverflow)
            .map(|scaled| scaled / u128::from(duration))
    }

    /// Units that vest between `from` and `to`, both clipped to the
    /// schedule window.
    pub fn reward_between(&self, from: u64, to: u64) -> SlipwayResult<u128> {
        if to <= from {
            return Ok(0);
        }
        Ok(self.vested_at(to)? - self.vested_at(from)?)
    }

    /// One-based index of the era `now` falls in, clipped to `era_count`.
    /// Zero before the schedule starts.
    pub fn era_at(&self, now: u64) -> u32 {
        if now <= self.start || self.era_seconds == 0 {
            return 0;
        }
        let elapsed = now - self.start;
        let era = (elapsed - 1) / self.era_seconds + 1;
        era.min(u64::from(self.era_count)) as u32
    }

    pub fn is_complete(&self, now: u64) -> bool {
        now >= self.start.saturating_add(self.duration())
    }
}
