//! Command-line interface definitions and argument parsing

use crate::agg::DateRange;
use chrono::NaiveDate;
use clap::Parser;

/// E-commerce order analytics over a flat orders+payments CSV export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the pre-joined orders+payments CSV export
    #[arg(short, long, default_value = "all_data.csv")]
    pub input: String,

    /// Path to the shop logo displayed with the dashboard
    #[arg(long, default_value = "shop_logo.png")]
    pub logo: String,

    /// Start of the purchase-date filter (YYYY-MM-DD, inclusive);
    /// defaults to the earliest purchase date in the dataset
    #[arg(short, long)]
    pub start: Option<NaiveDate>,

    /// End of the purchase-date filter (YYYY-MM-DD, inclusive);
    /// defaults to the latest purchase date in the dataset
    #[arg(short, long)]
    pub end: Option<NaiveDate>,

    /// Output path for the daily orders chart; the other charts derive
    /// their paths from it
    #[arg(short, long, default_value = "dashboard.png")]
    pub output: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Resolve the effective date range, filling unset bounds from the
    /// dataset's min/max purchase dates.
    pub fn resolve_range(&self, min: NaiveDate, max: NaiveDate) -> DateRange {
        DateRange::new(self.start.unwrap_or(min), self.end.unwrap_or(max))
    }

    /// Path for the payment-type popularity chart.
    pub fn payments_chart_path(&self) -> String {
        self.output.replace(".png", "_payments.png")
    }

    /// Path for the payment-type × order-status chart.
    pub fn payment_status_chart_path(&self) -> String {
        self.output.replace(".png", "_payment_status.png")
    }
}
