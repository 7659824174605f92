//! OrderScope: order analytics dashboard over a flat orders+payments export
//!
//! Entrypoint that wires loading, date-range filtering, aggregation, and
//! rendering together.

use anyhow::Result;
use clap::Parser;
use orderscope::{viz, Args, Session};
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("OrderScope - E-Store Order Analytics");
        println!("====================================\n");
    }

    // The logo is decorative, but its absence is a startup error
    viz::verify_logo(Path::new(&args.logo))?;

    let start_time = Instant::now();

    // Step 1: Load the dataset
    if args.verbose {
        println!("Step 1: Loading dataset");
        println!("  Input file: {}", args.input);
    }

    let load_start = Instant::now();
    let session = Session::load(Path::new(&args.input))?;
    let load_time = load_start.elapsed();

    let dataset = session.dataset();
    println!(
        "✓ Dataset loaded: {} orders, {} payment records",
        dataset.orders.len(),
        dataset.payments.len()
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", load_time.as_secs_f64());
        if dataset.skipped_rows > 0 {
            println!("  Skipped rows: {}", dataset.skipped_rows);
        }
    }

    // Step 2: Resolve the date filter; unset bounds fall back to the
    // dataset's min/max purchase dates
    let Some((min_date, max_date)) = session.date_bounds() else {
        anyhow::bail!("dataset contains no dated orders");
    };
    let range = args.resolve_range(min_date, max_date);

    if args.verbose {
        println!("\nStep 2: Applying date filter");
        println!("  Dataset bounds: {} to {}", min_date, max_date);
        println!("  Selected range: {} to {}", range.start, range.end);
    }

    // Step 3: Recompute every derived table for the selected range
    let agg_start = Instant::now();
    let snapshot = session.recompute(range);
    let agg_time = agg_start.elapsed();

    println!("✓ Aggregates recomputed for {} to {}", range.start, range.end);
    if args.verbose {
        println!("  Aggregation time: {:.2}s", agg_time.as_secs_f64());
    }

    viz::print_snapshot(&snapshot);

    // Step 4: Render charts. A failing chart is reported and skipped so the
    // remaining output still lands.
    println!();
    if let Err(err) = viz::render_daily_orders_chart(&snapshot.daily_orders, &args.output) {
        eprintln!("warning: daily orders chart failed: {:#}", err);
    }
    if let Err(err) =
        viz::render_payment_type_chart(&snapshot.payment_summary, &args.payments_chart_path())
    {
        eprintln!("warning: payment type chart failed: {:#}", err);
    }
    if let Err(err) = viz::render_payment_status_chart(
        &snapshot.payment_status,
        &args.payment_status_chart_path(),
    ) {
        eprintln!("warning: payment status chart failed: {:#}", err);
    }

    let total_time = start_time.elapsed();
    println!("\n=== Dashboard Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
