//! Flat dataset loading and the order/payment record types

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// A single order. `order_id` is unique within a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub purchase_ts: NaiveDateTime,
    /// Free-form status text; revenue matching compares against
    /// `"delivered"` exactly, case-sensitively.
    pub status: String,
    pub order_value: f64,
}

/// A payment record. An order may have several; `order_id` repeats.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub order_id: String,
    pub payment_type: String,
    pub payment_value: f64,
}

/// In-memory dataset, immutable after load. Every interaction re-filters and
/// re-aggregates from here; nothing is cached or mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
    /// Rows dropped during load (malformed fields or unparseable timestamps).
    pub skipped_rows: usize,
}

impl Dataset {
    /// Earliest purchase date in the dataset, if any orders were loaded.
    pub fn min_purchase_date(&self) -> Option<NaiveDate> {
        self.orders.iter().map(|o| o.purchase_ts.date()).min()
    }

    /// Latest purchase date in the dataset, if any orders were loaded.
    pub fn max_purchase_date(&self) -> Option<NaiveDate> {
        self.orders.iter().map(|o| o.purchase_ts.date()).max()
    }
}

/// One row of the pre-joined export: order columns plus one payment record.
/// Extra columns in the file are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    order_id: String,
    customer_id: String,
    order_purchase_timestamp: String,
    order_status: String,
    order_value: f64,
    payment_type: String,
    payment_value: f64,
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a purchase timestamp, accepting the common export formats.
/// Date-only values are pinned to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Load the flat orders+payments CSV and split it back into the relational
/// model: the first row seen for an `order_id` defines the order, and every
/// row contributes one payment record.
///
/// Rows that fail to deserialize or carry an unparseable timestamp are
/// skipped and counted in [`Dataset::skipped_rows`] rather than aborting the
/// load. A file with no usable rows at all is an error.
pub fn load_dataset(path: &Path) -> crate::Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset at {}", path.display()))?;

    let mut orders = Vec::new();
    let mut payments = Vec::new();
    let mut seen_orders: HashSet<String> = HashSet::new();
    let mut skipped_rows = 0usize;

    for row in reader.deserialize::<RawRow>() {
        let row = match row {
            Ok(row) => row,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };

        let Some(purchase_ts) = parse_timestamp(&row.order_purchase_timestamp) else {
            skipped_rows += 1;
            continue;
        };

        if seen_orders.insert(row.order_id.clone()) {
            orders.push(Order {
                order_id: row.order_id.clone(),
                customer_id: row.customer_id,
                purchase_ts,
                status: row.order_status,
                order_value: row.order_value,
            });
        }
        payments.push(Payment {
            order_id: row.order_id,
            payment_type: row.payment_type,
            payment_value: row.payment_value,
        });
    }

    if orders.is_empty() {
        anyhow::bail!("no usable rows found in {}", path.display());
    }

    Ok(Dataset {
        orders,
        payments,
        skipped_rows,
    })
}
