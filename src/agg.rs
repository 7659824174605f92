//! Date-range filtering and the aggregation transforms behind each
//! dashboard table

use crate::data::{Order, Payment};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Status value that counts toward revenue. Matched exactly; "Delivered" or
/// "DELIVERED" do not qualify.
pub const DELIVERED_STATUS: &str = "delivered";

/// Inclusive calendar-date range over purchase timestamps.
///
/// `start > end` is not rejected: such a range simply contains no dates, so
/// filtering with it yields an empty subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Restrict orders to those purchased within the range, i.e. between
/// start 00:00:00 and end 23:59:59 inclusive.
pub fn filter_orders(orders: &[Order], range: DateRange) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| range.contains(o.purchase_ts.date()))
        .cloned()
        .collect()
}

/// One row of the daily orders table.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyOrdersRow {
    pub date: NaiveDate,
    pub order_count: usize,
    pub total_order_value: f64,
}

/// Group orders by calendar date: per-day order count and order-value total,
/// ascending by date. Days without orders are simply absent.
pub fn daily_orders(orders: &[Order]) -> Vec<DailyOrdersRow> {
    let mut by_date: BTreeMap<NaiveDate, (usize, f64)> = BTreeMap::new();
    for order in orders {
        let entry = by_date.entry(order.purchase_ts.date()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += order.order_value;
    }
    by_date
        .into_iter()
        .map(|(date, (order_count, total_order_value))| DailyOrdersRow {
            date,
            order_count,
            total_order_value,
        })
        .collect()
}

/// One row of the payment-type summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSummaryRow {
    pub payment_type: String,
    pub payment_count: usize,
    pub total_payment_value: f64,
}

/// Group payments by payment type: record count and value total per type,
/// descending by count. Ties keep first-encountered order (stable sort).
pub fn payment_summary(payments: &[Payment]) -> Vec<PaymentSummaryRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<PaymentSummaryRow> = Vec::new();
    for payment in payments {
        let slot = match index.get(&payment.payment_type) {
            Some(&slot) => slot,
            None => {
                index.insert(payment.payment_type.clone(), rows.len());
                rows.push(PaymentSummaryRow {
                    payment_type: payment.payment_type.clone(),
                    payment_count: 0,
                    total_payment_value: 0.0,
                });
                rows.len() - 1
            }
        };
        rows[slot].payment_count += 1;
        rows[slot].total_payment_value += payment.payment_value;
    }
    rows.sort_by(|a, b| b.payment_count.cmp(&a.payment_count));
    rows
}

/// One row of the order-status breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCountRow {
    pub order_status: String,
    pub count: usize,
}

/// Count orders per status, descending by count. Ties keep first-encountered
/// order (stable sort).
pub fn order_status_counts(orders: &[Order]) -> Vec<StatusCountRow> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<StatusCountRow> = Vec::new();
    for order in orders {
        let slot = match index.get(&order.status) {
            Some(&slot) => slot,
            None => {
                index.insert(order.status.clone(), rows.len());
                rows.push(StatusCountRow {
                    order_status: order.status.clone(),
                    count: 0,
                });
                rows.len() - 1
            }
        };
        rows[slot].count += 1;
    }
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Inner join of one order with one of its payment records.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub order_id: String,
    pub customer_id: String,
    pub purchase_ts: chrono::NaiveDateTime,
    pub order_status: String,
    pub order_value: f64,
    pub payment_type: String,
    pub payment_value: f64,
}

/// Inner join on `order_id`. An order with N payments appears N times; orders
/// without payments and payments without a matching order are dropped
/// silently. Callers relying on revenue totals will therefore undercount
/// orders that have no recorded payment — this is deliberate.
pub fn join_orders_payments(orders: &[Order], payments: &[Payment]) -> Vec<MergedRecord> {
    let by_id: HashMap<&str, &Order> = orders
        .iter()
        .map(|order| (order.order_id.as_str(), order))
        .collect();

    payments
        .iter()
        .filter_map(|payment| {
            by_id.get(payment.order_id.as_str()).map(|order| MergedRecord {
                order_id: payment.order_id.clone(),
                customer_id: order.customer_id.clone(),
                purchase_ts: order.purchase_ts,
                order_status: order.status.clone(),
                order_value: order.order_value,
                payment_type: payment.payment_type.clone(),
                payment_value: payment.payment_value,
            })
        })
        .collect()
}

/// One row of the daily revenue table.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenueRow {
    pub date: NaiveDate,
    pub revenue: f64,
}

/// Sum payment values per purchase date over delivered orders only. Orders in
/// any other status contribute nothing, paid or not.
pub fn daily_revenue(merged: &[MergedRecord]) -> Vec<DailyRevenueRow> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for rec in merged.iter().filter(|r| r.order_status == DELIVERED_STATUS) {
        *by_date.entry(rec.purchase_ts.date()).or_insert(0.0) += rec.payment_value;
    }
    by_date
        .into_iter()
        .map(|(date, revenue)| DailyRevenueRow { date, revenue })
        .collect()
}

/// One cell of the payment-type × order-status breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStatusRow {
    pub payment_type: String,
    pub order_status: String,
    pub count: usize,
}

/// Count joined records per (payment_type, order_status) pair, in
/// first-encountered order. Feeds the stacked bar chart.
pub fn payment_status_breakdown(merged: &[MergedRecord]) -> Vec<PaymentStatusRow> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut rows: Vec<PaymentStatusRow> = Vec::new();
    for rec in merged {
        let key = (rec.payment_type.clone(), rec.order_status.clone());
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key, rows.len());
                rows.push(PaymentStatusRow {
                    payment_type: rec.payment_type.clone(),
                    order_status: rec.order_status.clone(),
                    count: 0,
                });
                rows.len() - 1
            }
        };
        rows[slot].count += 1;
    }
    rows
}

/// Per-customer Recency/Frequency/Monetary metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct RfmRow {
    pub customer_id: String,
    /// Whole days between the newest purchase in the input and this
    /// customer's newest purchase. A customer holding that newest purchase
    /// has recency 0.
    pub recency_days: i64,
    /// Number of distinct orders.
    pub frequency: usize,
    /// Sum of payment values across all of the customer's joined rows. An
    /// order with several payment records counts each of them, matching the
    /// payment-summary semantics.
    pub monetary: f64,
}

/// Compute the RFM table over joined records, in first-encountered customer
/// order. Empty input yields an empty table.
pub fn rfm(merged: &[MergedRecord]) -> Vec<RfmRow> {
    let Some(global_max) = merged.iter().map(|r| r.purchase_ts).max() else {
        return Vec::new();
    };

    struct Acc {
        customer_id: String,
        last_purchase: chrono::NaiveDateTime,
        order_ids: HashSet<String>,
        monetary: f64,
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut accs: Vec<Acc> = Vec::new();
    for rec in merged {
        let slot = match index.get(&rec.customer_id) {
            Some(&slot) => slot,
            None => {
                index.insert(rec.customer_id.clone(), accs.len());
                accs.push(Acc {
                    customer_id: rec.customer_id.clone(),
                    last_purchase: rec.purchase_ts,
                    order_ids: HashSet::new(),
                    monetary: 0.0,
                });
                accs.len() - 1
            }
        };
        let acc = &mut accs[slot];
        acc.last_purchase = acc.last_purchase.max(rec.purchase_ts);
        acc.order_ids.insert(rec.order_id.clone());
        acc.monetary += rec.payment_value;
    }

    accs.into_iter()
        .map(|acc| RfmRow {
            customer_id: acc.customer_id,
            recency_days: (global_max - acc.last_purchase).num_days(),
            frequency: acc.order_ids.len(),
            monetary: acc.monetary,
        })
        .collect()
}

/// Mean Frequency over the RFM table. NaN for an empty table.
pub fn average_frequency(rows: &[RfmRow]) -> f64 {
    rows.iter().map(|r| r.frequency as f64).sum::<f64>() / rows.len() as f64
}

/// Mean Monetary over the RFM table. NaN for an empty table.
pub fn average_monetary(rows: &[RfmRow]) -> f64 {
    rows.iter().map(|r| r.monetary).sum::<f64>() / rows.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_timestamp;

    fn order(id: &str, customer: &str, ts: &str, status: &str, value: f64) -> Order {
        Order {
            order_id: id.to_string(),
            customer_id: customer.to_string(),
            purchase_ts: parse_timestamp(ts).unwrap(),
            status: status.to_string(),
            order_value: value,
        }
    }

    fn payment(order_id: &str, payment_type: &str, value: f64) -> Payment {
        Payment {
            order_id: order_id.to_string(),
            payment_type: payment_type.to_string(),
            payment_value: value,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_is_inclusive_on_both_bounds() {
        let orders = vec![
            order("O1", "C1", "2023-01-01 00:00:00", "delivered", 10.0),
            order("O2", "C2", "2023-01-05 23:59:59", "delivered", 10.0),
            order("O3", "C3", "2023-01-06 00:00:00", "delivered", 10.0),
        ];
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 5));

        let filtered = filter_orders(&orders, range);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|o| range.contains(o.purchase_ts.date())));
        assert!(filtered.len() <= orders.len());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let orders = vec![order("O1", "C1", "2023-01-03 12:00:00", "delivered", 10.0)];
        let range = DateRange::new(date(2023, 1, 5), date(2023, 1, 1));
        assert!(filter_orders(&orders, range).is_empty());
    }

    #[test]
    fn test_daily_orders_counts_and_sums() {
        let orders = vec![
            order("O1", "C1", "2023-01-01 08:00:00", "delivered", 100.0),
            order("O2", "C2", "2023-01-01 20:00:00", "shipped", 40.0),
            order("O3", "C3", "2023-01-03 12:00:00", "delivered", 60.0),
        ];

        let rows = daily_orders(&orders);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date(2023, 1, 1));
        assert_eq!(rows[0].order_count, 2);
        assert_eq!(rows[0].total_order_value, 140.0);
        assert_eq!(rows[1].date, date(2023, 1, 3));
        assert_eq!(rows[1].order_count, 1);

        // Per-day counts add back up to the input cardinality
        let total: usize = rows.iter().map(|r| r.order_count).sum();
        assert_eq!(total, orders.len());
    }

    #[test]
    fn test_payment_summary_conserves_counts() {
        let payments = vec![
            payment("O1", "credit_card", 50.0),
            payment("O2", "boleto", 30.0),
            payment("O3", "credit_card", 20.0),
            payment("O4", "voucher", 10.0),
        ];

        let rows = payment_summary(&payments);
        assert_eq!(rows[0].payment_type, "credit_card");
        assert_eq!(rows[0].payment_count, 2);
        assert_eq!(rows[0].total_payment_value, 70.0);

        // boleto and voucher tie at one record each; boleto was seen first
        assert_eq!(rows[1].payment_type, "boleto");
        assert_eq!(rows[2].payment_type, "voucher");

        let total: usize = rows.iter().map(|r| r.payment_count).sum();
        assert_eq!(total, payments.len());
    }

    #[test]
    fn test_status_counts_sorted_descending() {
        let orders = vec![
            order("O1", "C1", "2023-01-01 08:00:00", "shipped", 10.0),
            order("O2", "C2", "2023-01-01 09:00:00", "delivered", 10.0),
            order("O3", "C3", "2023-01-02 10:00:00", "delivered", 10.0),
            order("O4", "C4", "2023-01-02 11:00:00", "canceled", 10.0),
        ];

        let rows = order_status_counts(&orders);
        assert_eq!(rows[0].order_status, "delivered");
        assert_eq!(rows[0].count, 2);
        // shipped and canceled tie; shipped was encountered first
        assert_eq!(rows[1].order_status, "shipped");
        assert_eq!(rows[2].order_status, "canceled");
    }

    #[test]
    fn test_join_is_inner_and_many_to_one() {
        let orders = vec![
            order("O1", "C1", "2023-01-01 08:00:00", "delivered", 100.0),
            order("O2", "C2", "2023-01-02 08:00:00", "shipped", 50.0),
        ];
        let payments = vec![
            payment("O1", "credit_card", 60.0),
            payment("O1", "voucher", 40.0),
            payment("O9", "boleto", 99.0), // no matching order, dropped
        ];

        let merged = join_orders_payments(&orders, &payments);
        assert_eq!(merged.len(), 2); // O1 twice, O2 unpaid so absent, O9 dropped
        assert!(merged.iter().all(|r| r.order_id == "O1"));
        assert!(merged
            .iter()
            .all(|r| orders.iter().any(|o| o.order_id == r.order_id)
                && payments.iter().any(|p| p.order_id == r.order_id)));
    }

    #[test]
    fn test_daily_revenue_delivered_only() {
        let orders = vec![
            order("O1", "C1", "2023-01-01 08:00:00", "delivered", 100.0),
            order("O2", "C2", "2023-01-01 09:00:00", "canceled", 80.0),
            order("O3", "C3", "2023-01-02 10:00:00", "Delivered", 70.0), // wrong case
        ];
        let payments = vec![
            payment("O1", "credit_card", 100.0),
            payment("O2", "boleto", 80.0),
            payment("O3", "voucher", 70.0),
        ];

        let merged = join_orders_payments(&orders, &payments);
        let rows = daily_revenue(&merged);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, date(2023, 1, 1));
        assert_eq!(rows[0].revenue, 100.0);

        // Pre-dropping non-delivered rows and resumming changes nothing
        let delivered_only: Vec<MergedRecord> = merged
            .iter()
            .filter(|r| r.order_status == DELIVERED_STATUS)
            .cloned()
            .collect();
        assert_eq!(daily_revenue(&delivered_only), rows);
    }

    #[test]
    fn test_rfm_worked_example() {
        // Orders O1 and O2 for customer C1, payments 50+50 on O1 and 50 on O2
        let orders = vec![
            order("O1", "C1", "2023-01-01 00:00:00", "delivered", 100.0),
            order("O2", "C1", "2023-01-05 00:00:00", "delivered", 50.0),
        ];
        let payments = vec![
            payment("O1", "credit_card", 50.0),
            payment("O1", "credit_card", 50.0),
            payment("O2", "credit_card", 50.0),
        ];

        let merged = join_orders_payments(&orders, &payments);
        let revenue = daily_revenue(&merged);
        assert_eq!(revenue[0], DailyRevenueRow { date: date(2023, 1, 1), revenue: 100.0 });
        assert_eq!(revenue[1], DailyRevenueRow { date: date(2023, 1, 5), revenue: 50.0 });

        let rows = rfm(&merged);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_id, "C1");
        assert_eq!(rows[0].recency_days, 0);
        assert_eq!(rows[0].frequency, 2);
        assert_eq!(rows[0].monetary, 150.0);
    }

    #[test]
    fn test_rfm_single_order_customer() {
        let orders = vec![
            order("O1", "C1", "2023-01-10 12:00:00", "delivered", 30.0),
            order("O2", "C2", "2023-01-03 12:00:00", "delivered", 20.0),
        ];
        let payments = vec![payment("O1", "credit_card", 30.0), payment("O2", "boleto", 20.0)];

        let rows = rfm(&join_orders_payments(&orders, &payments));
        let c1 = rows.iter().find(|r| r.customer_id == "C1").unwrap();
        let c2 = rows.iter().find(|r| r.customer_id == "C2").unwrap();

        // C1 holds the newest purchase in the set
        assert_eq!(c1.recency_days, 0);
        assert_eq!(c1.frequency, 1);
        assert_eq!(c2.recency_days, 7);
        assert_eq!(c2.frequency, 1);
    }

    #[test]
    fn test_empty_inputs_yield_empty_tables() {
        assert!(daily_orders(&[]).is_empty());
        assert!(payment_summary(&[]).is_empty());
        assert!(order_status_counts(&[]).is_empty());
        assert!(daily_revenue(&[]).is_empty());
        assert!(payment_status_breakdown(&[]).is_empty());
        assert!(rfm(&[]).is_empty());
        assert!(average_frequency(&[]).is_nan());
        assert!(average_monetary(&[]).is_nan());
    }

    #[test]
    fn test_payment_status_breakdown_counts_pairs() {
        let orders = vec![
            order("O1", "C1", "2023-01-01 08:00:00", "delivered", 100.0),
            order("O2", "C2", "2023-01-02 08:00:00", "canceled", 50.0),
        ];
        let payments = vec![
            payment("O1", "credit_card", 60.0),
            payment("O1", "credit_card", 40.0),
            payment("O2", "credit_card", 50.0),
        ];

        let rows = payment_status_breakdown(&join_orders_payments(&orders, &payments));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].payment_type, "credit_card");
        assert_eq!(rows[0].order_status, "delivered");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].order_status, "canceled");
        assert_eq!(rows[1].count, 1);
    }
}
