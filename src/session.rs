//! Session context: one loaded dataset, one recompute per interaction

use crate::agg::{
    self, DailyOrdersRow, DailyRevenueRow, DateRange, PaymentStatusRow, PaymentSummaryRow,
    RfmRow, StatusCountRow,
};
use crate::data::{load_dataset, Dataset, Payment};
use chrono::NaiveDate;
use std::path::Path;

/// Holds the immutable dataset for one analysis session. Every filter change
/// goes through [`Session::recompute`], which rebuilds all derived tables
/// from scratch — no caching, no hidden state.
#[derive(Debug)]
pub struct Session {
    dataset: Dataset,
}

/// Every derived table for one date-range selection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub range: DateRange,
    pub filtered_order_count: usize,
    pub daily_orders: Vec<DailyOrdersRow>,
    pub payment_summary: Vec<PaymentSummaryRow>,
    pub status_counts: Vec<StatusCountRow>,
    pub payment_status: Vec<PaymentStatusRow>,
    pub daily_revenue: Vec<DailyRevenueRow>,
    pub rfm: Vec<RfmRow>,
    pub average_frequency: f64,
    pub average_monetary: f64,
}

impl Session {
    /// Load the flat CSV at `path` into a new session.
    pub fn load(path: &Path) -> crate::Result<Self> {
        Ok(Self {
            dataset: load_dataset(path)?,
        })
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Min and max purchase dates of the loaded data; these are the default
    /// bounds for the date filter.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (
            self.dataset.min_purchase_date(),
            self.dataset.max_purchase_date(),
        ) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    /// Rebuild every dashboard table for the given range.
    ///
    /// Filter → join → aggregate, all synchronous. Payments enter the
    /// pipeline through the join, so only payments of in-range orders are
    /// summarized.
    pub fn recompute(&self, range: DateRange) -> Snapshot {
        let filtered = agg::filter_orders(&self.dataset.orders, range);
        let merged = agg::join_orders_payments(&filtered, &self.dataset.payments);

        let filtered_payments: Vec<Payment> = merged
            .iter()
            .map(|rec| Payment {
                order_id: rec.order_id.clone(),
                payment_type: rec.payment_type.clone(),
                payment_value: rec.payment_value,
            })
            .collect();

        let rfm = agg::rfm(&merged);
        let average_frequency = agg::average_frequency(&rfm);
        let average_monetary = agg::average_monetary(&rfm);

        Snapshot {
            range,
            filtered_order_count: filtered.len(),
            daily_orders: agg::daily_orders(&filtered),
            payment_summary: agg::payment_summary(&filtered_payments),
            status_counts: agg::order_status_counts(&filtered),
            payment_status: agg::payment_status_breakdown(&merged),
            daily_revenue: agg::daily_revenue(&merged),
            rfm,
            average_frequency,
            average_monetary,
        }
    }
}
