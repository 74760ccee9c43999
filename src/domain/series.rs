//! Synthetic price/volume series.
//!
//! Prices follow a drifting Gaussian random walk:
//! step[i] = drift + volatility * z[i], z ~ N(0, 1)
//! price[0] = step[0], price[i] = price[i-1] + step[i]
//! Volumes are drawn uniformly from [volume_min, volume_max) after the price path,
//! from the same seeded generator, so a seed fully determines the series.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use super::error::TwapError;

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub volume: i64,
}

impl Tick {
    pub fn notional(&self) -> f64 {
        self.price * self.volume as f64
    }
}

/// Ordered, immutable sequence of ticks at a fixed sampling interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    ticks: Vec<Tick>,
    interval: TimeDelta,
}

impl Series {
    /// Build a series from pre-made ticks. Timestamps must be strictly increasing
    /// and evenly spaced.
    pub fn from_ticks(ticks: Vec<Tick>) -> Result<Self, TwapError> {
        if ticks.is_empty() {
            return Err(TwapError::invalid("records", "series must not be empty"));
        }
        let interval = if ticks.len() > 1 {
            ticks[1].timestamp - ticks[0].timestamp
        } else {
            TimeDelta::zero()
        };
        if ticks.len() > 1 && interval <= TimeDelta::zero() {
            return Err(TwapError::invalid(
                "timestamp",
                "timestamps must be strictly increasing",
            ));
        }
        for pair in ticks.windows(2) {
            if pair[1].timestamp - pair[0].timestamp != interval {
                return Err(TwapError::invalid(
                    "timestamp",
                    format!("uneven sampling interval at {}", pair[1].timestamp),
                ));
            }
        }
        Ok(Series { ticks, interval })
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn interval(&self) -> TimeDelta {
        self.interval
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.ticks.iter().map(|t| t.price)
    }

    /// Arithmetic mean of all prices.
    pub fn mean_price(&self) -> f64 {
        self.prices().sum::<f64>() / self.ticks.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesParams {
    pub records: usize,
    pub seed: u64,
    pub start: NaiveDateTime,
    pub interval_secs: i64,
    pub drift: f64,
    pub volatility: f64,
    pub volume_min: i64,
    pub volume_max: i64,
}

impl Default for SeriesParams {
    fn default() -> Self {
        SeriesParams {
            records: 100,
            seed: 42,
            start: default_start(),
            interval_secs: 60,
            drift: 100.0,
            volatility: 0.5,
            volume_min: 100,
            volume_max: 1000,
        }
    }
}

pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl SeriesParams {
    pub fn validate(&self) -> Result<(), TwapError> {
        if self.records == 0 {
            return Err(TwapError::invalid("records", "must be positive"));
        }
        if self.interval_secs <= 0 {
            return Err(TwapError::invalid("interval_secs", "must be positive"));
        }
        if !self.drift.is_finite() {
            return Err(TwapError::invalid("drift", "must be finite"));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(TwapError::invalid(
                "volatility",
                "must be finite and non-negative",
            ));
        }
        if self.volume_min <= 0 {
            return Err(TwapError::invalid("volume_min", "must be positive"));
        }
        if self.volume_max <= self.volume_min {
            return Err(TwapError::invalid(
                "volume_max",
                format!("must exceed volume_min ({})", self.volume_min),
            ));
        }
        // largest drawable volume is volume_max - 1; the running total must fit i64
        let worst_total = i64::try_from(self.records)
            .ok()
            .and_then(|n| n.checked_mul(self.volume_max - 1));
        if worst_total.is_none() {
            return Err(TwapError::invalid(
                "volume_max",
                format!(
                    "{} records of up to {} volume overflow the running total",
                    self.records,
                    self.volume_max - 1
                ),
            ));
        }
        Ok(())
    }

    fn timestamp_at(&self, index: usize) -> Result<NaiveDateTime, TwapError> {
        let offset = i64::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(self.interval_secs))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| TwapError::invalid("interval_secs", "timestamp range overflow"))?;
        self.start
            .checked_add_signed(offset)
            .ok_or_else(|| TwapError::invalid("start", "timestamp range overflow"))
    }
}

/// Generate a deterministic synthetic series.
pub fn generate_series(params: &SeriesParams) -> Result<Series, TwapError> {
    params.validate()?;

    let interval = TimeDelta::try_seconds(params.interval_secs)
        .ok_or_else(|| TwapError::invalid("interval_secs", "out of range"))?;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let mut prices = Vec::with_capacity(params.records);
    let mut level = 0.0_f64;
    for _ in 0..params.records {
        let z: f64 = rng.sample(StandardNormal);
        level += params.drift + params.volatility * z;
        prices.push(level);
    }

    let mut ticks = Vec::with_capacity(params.records);
    for (i, price) in prices.into_iter().enumerate() {
        let volume = rng.gen_range(params.volume_min..params.volume_max);
        ticks.push(Tick {
            timestamp: params.timestamp_at(i)?,
            price,
            volume,
        });
    }

    log::debug!(
        "generated {} ticks from seed {} starting {}",
        ticks.len(),
        params.seed,
        params.start
    );

    Ok(Series { ticks, interval })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_series() {
        let params = SeriesParams::default();
        let a = generate_series(&params).unwrap();
        let b = generate_series(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_series() {
        let a = generate_series(&SeriesParams::default()).unwrap();
        let b = generate_series(&SeriesParams {
            seed: 7,
            ..SeriesParams::default()
        })
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn record_count_and_spacing() {
        let series = generate_series(&SeriesParams::default()).unwrap();
        assert_eq!(series.len(), 100);
        assert_eq!(series.ticks()[0].timestamp, default_start());
        for pair in series.ticks().windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, TimeDelta::seconds(60));
        }
        assert_eq!(series.interval(), TimeDelta::seconds(60));
    }

    #[test]
    fn volumes_within_half_open_range() {
        let series = generate_series(&SeriesParams {
            records: 500,
            ..SeriesParams::default()
        })
        .unwrap();
        assert!(series
            .ticks()
            .iter()
            .all(|t| (100..1000).contains(&t.volume)));
    }

    #[test]
    fn zero_volatility_is_pure_drift() {
        let series = generate_series(&SeriesParams {
            records: 4,
            volatility: 0.0,
            drift: 2.5,
            ..SeriesParams::default()
        })
        .unwrap();
        let prices: Vec<f64> = series.prices().collect();
        assert_eq!(prices, vec![2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn price_walk_accumulates_drift() {
        // drift 100 per step dwarfs the 0.5 volatility, so the walk climbs every step
        let series = generate_series(&SeriesParams::default()).unwrap();
        for pair in series.ticks().windows(2) {
            assert!(pair[1].price > pair[0].price);
        }
    }

    #[test]
    fn zero_records_rejected() {
        let err = generate_series(&SeriesParams {
            records: 0,
            ..SeriesParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, TwapError::InvalidConfiguration { ref field, .. } if field == "records"));
    }

    #[test]
    fn empty_volume_range_rejected() {
        let err = generate_series(&SeriesParams {
            volume_min: 500,
            volume_max: 500,
            ..SeriesParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, TwapError::InvalidConfiguration { ref field, .. } if field == "volume_max"));
    }

    #[test]
    fn non_positive_volume_rejected() {
        let err = generate_series(&SeriesParams {
            volume_min: 0,
            ..SeriesParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, TwapError::InvalidConfiguration { ref field, .. } if field == "volume_min"));
    }

    #[test]
    fn volume_range_that_overflows_running_total_rejected() {
        let err = SeriesParams {
            records: 10,
            volume_min: i64::MAX / 2,
            volume_max: i64::MAX,
            ..SeriesParams::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, TwapError::InvalidConfiguration { ref field, .. } if field == "volume_max"));
    }

    #[test]
    fn largest_safe_volume_range_accepted() {
        let params = SeriesParams {
            records: 4,
            volume_min: 1,
            volume_max: i64::MAX / 4 + 1,
            ..SeriesParams::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn negative_volatility_rejected() {
        assert!(SeriesParams {
            volatility: -0.1,
            ..SeriesParams::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn from_ticks_rejects_uneven_spacing() {
        let t0 = default_start();
        let ticks = vec![
            Tick { timestamp: t0, price: 1.0, volume: 1 },
            Tick { timestamp: t0 + TimeDelta::seconds(60), price: 1.0, volume: 1 },
            Tick { timestamp: t0 + TimeDelta::seconds(90), price: 1.0, volume: 1 },
        ];
        assert!(Series::from_ticks(ticks).is_err());
    }

    #[test]
    fn from_ticks_rejects_decreasing_timestamps() {
        let t0 = default_start();
        let ticks = vec![
            Tick { timestamp: t0, price: 1.0, volume: 1 },
            Tick { timestamp: t0 - TimeDelta::seconds(60), price: 1.0, volume: 1 },
        ];
        assert!(Series::from_ticks(ticks).is_err());
    }

    #[test]
    fn mean_price() {
        let t0 = default_start();
        let ticks = vec![
            Tick { timestamp: t0, price: 10.0, volume: 1 },
            Tick { timestamp: t0 + TimeDelta::seconds(1), price: 20.0, volume: 1 },
            Tick { timestamp: t0 + TimeDelta::seconds(2), price: 30.0, volume: 1 },
        ];
        let series = Series::from_ticks(ticks).unwrap();
        assert!((series.mean_price() - 20.0).abs() < f64::EPSILON);
    }
}
