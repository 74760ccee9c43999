//! Execution quality metrics.
//!
//! executed_price  = mean of slice execution prices
//! vwap_price      = last value of the VWAP curve
//! execution_cost  = executed_price - vwap_price
//! expected_price  = mean of every price in the series
//! slippage        = executed_price - expected_price

use std::fmt::Write as _;

use super::error::TwapError;
use super::series::Series;
use super::twap::ExecutionSchedule;
use super::vwap::final_vwap;

const BPS: f64 = 10_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionMetrics {
    pub executed_price: f64,
    pub vwap_price: f64,
    pub execution_cost: f64,
    pub expected_price: f64,
    pub slippage: f64,
    pub execution_cost_bps: f64,
    pub slippage_bps: f64,
    pub filled_quantity: i64,
    pub excluded_records: usize,
}

impl ExecutionMetrics {
    pub fn compute(
        series: &Series,
        vwap: &[f64],
        schedule: &ExecutionSchedule,
    ) -> Result<Self, TwapError> {
        if series.is_empty() {
            return Err(TwapError::invalid("records", "series is empty"));
        }
        if schedule.slices.is_empty() {
            return Err(TwapError::invalid("num_trades", "schedule has no slices"));
        }
        let vwap_price = final_vwap(vwap)
            .ok_or_else(|| TwapError::invalid("vwap", "curve is empty"))?;

        let executed_price =
            schedule.prices().sum::<f64>() / schedule.slices.len() as f64;
        let expected_price = series.mean_price();
        let execution_cost = executed_price - vwap_price;
        let slippage = executed_price - expected_price;

        Ok(ExecutionMetrics {
            executed_price,
            vwap_price,
            execution_cost,
            expected_price,
            slippage,
            execution_cost_bps: to_bps(execution_cost, vwap_price),
            slippage_bps: to_bps(slippage, expected_price),
            filled_quantity: schedule.filled_quantity(),
            excluded_records: schedule.excluded,
        })
    }

    /// Header plus the five headline figures at two decimals.
    pub fn render(&self) -> String {
        let mut out = String::from("Execution Metrics\n");
        let _ = writeln!(out, "Executed Price: {:.2}", self.executed_price);
        let _ = writeln!(out, "VWAP Price: {:.2}", self.vwap_price);
        let _ = writeln!(out, "Execution Cost: {:.2}", self.execution_cost);
        let _ = writeln!(out, "Expected Price: {:.2}", self.expected_price);
        let _ = writeln!(out, "Slippage: {:.2}", self.slippage);
        out
    }

    pub fn render_detailed(&self) -> String {
        let mut out = self.render();
        let _ = writeln!(out, "Execution Cost (bps): {:.2}", self.execution_cost_bps);
        let _ = writeln!(out, "Slippage (bps): {:.2}", self.slippage_bps);
        let _ = writeln!(out, "Filled Quantity: {}", self.filled_quantity);
        let _ = writeln!(out, "Excluded Records: {}", self.excluded_records);
        out
    }
}

fn to_bps(diff: f64, reference: f64) -> f64 {
    if reference != 0.0 {
        diff / reference * BPS
    } else {
        0.0
    }
}
