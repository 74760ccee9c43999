//! Naive TWAP execution simulation.
//!
//! The series is split into `num_trades` contiguous chunks of
//! `interval = n / num_trades` records. Each chunk executes one slice at the
//! arithmetic mean of its prices, stamped with the chunk's first timestamp.
//!
//! When `n` is not a multiple of `num_trades` the trailing `n % num_trades`
//! records fall outside every chunk. [`RemainderPolicy`] decides what happens
//! to them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::error::TwapError;
use super::series::Series;

/// Treatment of the `n % num_trades` records left over by integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Leftover records take no part in any slice.
    #[default]
    Exclude,
    /// The final slice extends to the end of the series.
    AbsorbIntoLast,
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainderPolicy::Exclude => write!(f, "exclude"),
            RemainderPolicy::AbsorbIntoLast => write!(f, "absorb"),
        }
    }
}

impl FromStr for RemainderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exclude" | "drop" => Ok(RemainderPolicy::Exclude),
            "absorb" | "absorb_into_last" | "extend" => Ok(RemainderPolicy::AbsorbIntoLast),
            other => Err(format!(
                "unknown remainder policy '{other}' (expected exclude or absorb)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionParams {
    pub num_trades: usize,
    /// Parent order size split evenly across slices.
    pub total_volume: i64,
    pub remainder: RemainderPolicy,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        ExecutionParams {
            num_trades: 10,
            total_volume: 10_000,
            remainder: RemainderPolicy::Exclude,
        }
    }
}

impl ExecutionParams {
    pub fn validate(&self, records: usize) -> Result<(), TwapError> {
        if self.num_trades == 0 {
            return Err(TwapError::invalid("num_trades", "must be positive"));
        }
        if self.num_trades > records {
            return Err(TwapError::invalid(
                "num_trades",
                format!(
                    "{} trades exceed the {} available records",
                    self.num_trades, records
                ),
            ));
        }
        if self.total_volume <= 0 {
            return Err(TwapError::invalid("total_volume", "must be positive"));
        }
        Ok(())
    }

    /// Quantity per slice. Integer division, so up to `num_trades - 1` units
    /// of the parent order stay unfilled.
    pub fn slice_quantity(&self) -> i64 {
        self.total_volume / self.num_trades as i64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSlice {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub quantity: i64,
    /// Number of ticks averaged into `price`.
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSchedule {
    pub interval: usize,
    pub slices: Vec<ExecutionSlice>,
    /// Records that no slice covers.
    pub excluded: usize,
    pub remainder: RemainderPolicy,
}

impl ExecutionSchedule {
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.slices.iter().map(|s| s.price)
    }

    pub fn covered_records(&self) -> usize {
        self.slices.iter().map(|s| s.records).sum()
    }

    pub fn filled_quantity(&self) -> i64 {
        self.slices.iter().map(|s| s.quantity).sum()
    }
}

pub fn simulate_twap(
    series: &Series,
    params: &ExecutionParams,
) -> Result<ExecutionSchedule, TwapError> {
    let n = series.len();
    params.validate(n)?;

    let interval = n / params.num_trades;
    let remainder_records = n % params.num_trades;
    let quantity = params.slice_quantity();
    let ticks = series.ticks();

    let mut slices = Vec::with_capacity(params.num_trades);
    for index in 0..params.num_trades {
        let start = index * interval;
        let is_last = index + 1 == params.num_trades;
        let end = match params.remainder {
            RemainderPolicy::AbsorbIntoLast if is_last => n,
            _ => start + interval,
        };
        let chunk = &ticks[start..end];
        let price = chunk.iter().map(|t| t.price).sum::<f64>() / chunk.len() as f64;

        log::debug!(
            "slice {}: records {}..{} @ {:.4} qty {}",
            index,
            start,
            end,
            price,
            quantity
        );

        slices.push(ExecutionSlice {
            index,
            timestamp: ticks[start].timestamp,
            price,
            quantity,
            records: chunk.len(),
        });
    }

    let excluded = match params.remainder {
        RemainderPolicy::Exclude => remainder_records,
        RemainderPolicy::AbsorbIntoLast => 0,
    };
    if excluded > 0 {
        log::warn!(
            "{} records do not divide into {} trades; last {} of {} records excluded from execution",
            n,
            params.num_trades,
            excluded,
            n
        );
    }

    Ok(ExecutionSchedule {
        interval,
        slices,
        excluded,
        remainder: params.remainder,
    })
}
