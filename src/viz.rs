//! Chart rendering with Plotters and console table output

use crate::agg::{DailyOrdersRow, DailyRevenueRow, PaymentStatusRow, PaymentSummaryRow, StatusCountRow};
use crate::session::Snapshot;
use anyhow::Context;
use chrono::Duration;
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;
use std::path::Path;

/// Color palette for order statuses in the stacked chart
const STATUS_COLORS: [RGBColor; 5] = [
    RED,
    BLUE,
    GREEN,
    YELLOW,
    MAGENTA,
];

/// Verify the decorative logo asset exists and is non-empty. Called once at
/// startup; a missing logo aborts the run.
pub fn verify_logo(path: &Path) -> crate::Result<()> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("logo asset missing: {}", path.display()))?;
    if !meta.is_file() || meta.len() == 0 {
        anyhow::bail!("logo asset unreadable or empty: {}", path.display());
    }
    Ok(())
}

/// Render the daily order counts as a line chart over a date axis.
///
/// An empty table skips the chart instead of failing, so an empty filter
/// range still produces the rest of the dashboard.
pub fn render_daily_orders_chart(rows: &[DailyOrdersRow], output_path: &str) -> crate::Result<()> {
    if rows.is_empty() {
        println!("No daily orders in range; skipped chart: {}", output_path);
        return Ok(());
    }

    let first_date = rows[0].date;
    let last_date = rows[rows.len() - 1].date;
    // Pad one day on each side so single-day ranges still have a visible span
    let x_start = first_date - Duration::days(1);
    let x_end = last_date + Duration::days(1);

    let max_count = rows.iter().map(|r| r.order_count).max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Daily Order Counts", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_start..x_end, 0f64..(max_count * 1.1 + 1.0))?;

    chart
        .configure_mesh()
        .x_desc("Purchase Date")
        .y_desc("Orders")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(LineSeries::new(
        rows.iter().map(|r| (r.date, r.order_count as f64)),
        &BLUE,
    ))?;
    chart.draw_series(
        rows.iter()
            .map(|r| Circle::new((r.date, r.order_count as f64), 3, BLUE.filled())),
    )?;

    root.present()?;
    println!("Daily orders chart saved to: {}", output_path);

    Ok(())
}

/// Render payment-type popularity as a bar chart, most used type first.
pub fn render_payment_type_chart(
    rows: &[PaymentSummaryRow],
    output_path: &str,
) -> crate::Result<()> {
    if rows.is_empty() {
        println!("No payments in range; skipped chart: {}", output_path);
        return Ok(());
    }

    let names: Vec<String> = rows.iter().map(|r| r.payment_type.clone()).collect();
    let max_count = rows.iter().map(|r| r.payment_count).max().unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Payment Method Popularity", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..rows.len()).into_segmented(), 0f64..(max_count * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Payment Type")
        .y_desc("Payment Records")
        .axis_desc_style(("sans-serif", 15))
        .x_label_formatter(&|seg| match seg {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                names.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), row.payment_count as f64),
            ],
            BLUE.filled(),
        )
    }))?;

    root.present()?;
    println!("Payment type chart saved to: {}", output_path);

    Ok(())
}

/// Render the payment-type × order-status breakdown as stacked bars, one
/// stack per payment type, one color per status.
pub fn render_payment_status_chart(
    rows: &[PaymentStatusRow],
    output_path: &str,
) -> crate::Result<()> {
    if rows.is_empty() {
        println!("No joined records in range; skipped chart: {}", output_path);
        return Ok(());
    }

    // Axis categories in first-encountered order
    let mut types: Vec<String> = Vec::new();
    let mut statuses: Vec<String> = Vec::new();
    for row in rows {
        if !types.contains(&row.payment_type) {
            types.push(row.payment_type.clone());
        }
        if !statuses.contains(&row.order_status) {
            statuses.push(row.order_status.clone());
        }
    }

    let count_of = |ty: &str, status: &str| -> usize {
        rows.iter()
            .find(|r| r.payment_type == ty && r.order_status == status)
            .map(|r| r.count)
            .unwrap_or(0)
    };

    let max_stack = types
        .iter()
        .map(|ty| statuses.iter().map(|s| count_of(ty, s)).sum::<usize>())
        .max()
        .unwrap_or(1) as f64;

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Payment Method vs Order Status", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..types.len()).into_segmented(), 0f64..(max_stack * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Payment Type")
        .y_desc("Orders")
        .axis_desc_style(("sans-serif", 15))
        .x_label_formatter(&|seg| match seg {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
                types.get(*i).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    // One series per status, stacked on top of the previous ones
    let mut bases = vec![0usize; types.len()];
    for (status_idx, status) in statuses.iter().enumerate() {
        let color = if status_idx < STATUS_COLORS.len() {
            STATUS_COLORS[status_idx]
        } else {
            BLACK // Fallback color
        };

        let segments: Vec<Rectangle<(SegmentValue<usize>, f64)>> = types
            .iter()
            .enumerate()
            .filter_map(|(type_idx, ty)| {
                let count = count_of(ty, status);
                if count == 0 {
                    return None;
                }
                let base = bases[type_idx];
                bases[type_idx] = base + count;
                Some(Rectangle::new(
                    [
                        (SegmentValue::Exact(type_idx), base as f64),
                        (SegmentValue::Exact(type_idx + 1), (base + count) as f64),
                    ],
                    color.filled(),
                ))
            })
            .collect();

        chart
            .draw_series(segments)?
            .label(status.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y), (x + 10, y + 10)], color.filled()));
    }

    chart.configure_series_labels().draw()?;

    root.present()?;
    println!("Payment status chart saved to: {}", output_path);

    Ok(())
}

fn fmt_metric(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "n/a".to_string()
    }
}

/// Print every dashboard table and metric to the console.
pub fn print_snapshot(snapshot: &Snapshot) {
    println!(
        "\n=== Date Range: {} to {} ===",
        snapshot.range.start, snapshot.range.end
    );
    println!("Orders in range: {}", snapshot.filtered_order_count);

    print_daily_orders(&snapshot.daily_orders);
    print_payment_summary(&snapshot.payment_summary);
    print_status_counts(&snapshot.status_counts);
    print_daily_revenue(&snapshot.daily_revenue);

    println!("\n=== RFM (Recency, Frequency, Monetary) ===");
    println!("Customers: {}", snapshot.rfm.len());
    println!("Average Frequency: {}", fmt_metric(snapshot.average_frequency));
    println!("Average Monetary:  {}", fmt_metric(snapshot.average_monetary));
}

fn print_daily_orders(rows: &[DailyOrdersRow]) {
    println!("\nDaily orders:");
    println!("  Date       | Orders | Order Value");
    println!("  -----------|--------|------------");
    for row in rows {
        println!(
            "  {} | {:6} | {:11.2}",
            row.date, row.order_count, row.total_order_value
        );
    }
}

fn print_payment_summary(rows: &[PaymentSummaryRow]) {
    println!("\nPayment methods:");
    println!("  Type            | Records | Total Value");
    println!("  ----------------|---------|------------");
    for row in rows {
        println!(
            "  {:15} | {:7} | {:11.2}",
            row.payment_type, row.payment_count, row.total_payment_value
        );
    }
}

fn print_status_counts(rows: &[StatusCountRow]) {
    println!("\nOrder statuses:");
    for row in rows {
        println!("  {:15} {:6}", row.order_status, row.count);
    }
}

fn print_daily_revenue(rows: &[DailyRevenueRow]) {
    println!("\nDaily revenue (delivered orders):");
    println!("  Date       | Revenue");
    println!("  -----------|--------");
    for row in rows {
        println!("  {} | {:7.2}", row.date, row.revenue);
    }
}
