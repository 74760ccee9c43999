//! Running volume-weighted average price.
//!
//! VWAP[i] = sum(P[j] * V[j] for j in 0..=i) / sum(V[j] for j in 0..=i)
//! Each value depends only on its prefix; nothing is revised once emitted.

use super::error::TwapError;
use super::series::Series;

/// Compute the VWAP curve in a single pass over the series.
///
/// Returns `DivisionByZero` at the first index where cumulative volume is zero
/// instead of emitting NaN, and `VolumeOverflow` if the running volume leaves
/// the i64 range.
pub fn vwap_curve(series: &Series) -> Result<Vec<f64>, TwapError> {
    let mut values = Vec::with_capacity(series.len());
    let mut cum_notional = 0.0_f64;
    let mut cum_volume = 0i64;

    for (index, tick) in series.ticks().iter().enumerate() {
        cum_notional += tick.notional();
        cum_volume = cum_volume
            .checked_add(tick.volume)
            .ok_or(TwapError::VolumeOverflow { index })?;
        if cum_volume == 0 {
            return Err(TwapError::DivisionByZero { index });
        }
        values.push(cum_notional / cum_volume as f64);
    }

    Ok(values)
}

/// Final VWAP over the whole series, or `None` when the curve is empty.
pub fn final_vwap(curve: &[f64]) -> Option<f64> {
    curve.last().copied()
}
