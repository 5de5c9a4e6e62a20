//! Summary statistics command.

use anyhow::Result;
use console::style;
use shelf_core::stats::{HistogramBucket, StatsConfig, Summary, MAX_BINS};

use super::StatsArgs;
use crate::context::Context;
use crate::output::{format_float, format_price, truncate};

const BAR_WIDTH: usize = 40;

/// Run the stats command.
pub async fn run(args: StatsArgs, ctx: &Context) -> Result<()> {
    let criteria = args.criteria.to_criteria();
    let bins = args.bins.unwrap_or(ctx.config.stats.bins);
    if bins > MAX_BINS as i64 {
        tracing::warn!(requested = bins, max = MAX_BINS, "bin count capped");
    }
    let config = StatsConfig::new(bins, args.top_n.unwrap_or(ctx.config.stats.top_n));

    let service = ctx.open_service().await?;
    let spinner = ctx.output.spinner("Computing statistics...");
    let summary = service.stats(&criteria, config).await;
    spinner.finish_and_clear();
    let summary = summary?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    print_summary(&summary, ctx);
    Ok(())
}

fn print_summary(summary: &Summary, ctx: &Context) {
    ctx.output.header("Summary");
    ctx.output.kv("listings", &summary.total.to_string());
    ctx.output.kv("on discount", &summary.discount_count.to_string());

    if summary.is_empty() {
        ctx.output.info("No listings match these criteria.");
        return;
    }

    ctx.output.header("Prices");
    ctx.output.kv("min", &format_price(summary.min_price));
    ctx.output.kv("p25", &format_price(summary.p25_price));
    ctx.output.kv("median", &format_price(summary.p50_price));
    ctx.output.kv("p75", &format_price(summary.p75_price));
    ctx.output.kv("p90", &format_price(summary.p90_price));
    ctx.output.kv("max", &format_price(summary.max_price));
    ctx.output.kv("average", &format_float(summary.avg_price, 2));
    ctx.output.kv("average rating", &format_float(summary.avg_rating, 2));

    if !summary.histogram.is_empty() {
        ctx.output.header("Price distribution");
        print_histogram(&summary.histogram);
    }

    if !summary.top_benefit.is_empty() {
        ctx.output.header("Best rating per price");
        let widths = [40, 10, 8, 10];
        ctx.output.table_header(&["TITLE", "PRICE", "RATING", "BENEFIT"], &widths);
        for entry in &summary.top_benefit {
            ctx.output.table_row(
                &[
                    &entry.product.title,
                    &format_price(entry.product.price),
                    &format_float(entry.product.rating, 1),
                    &format!("{:.4}", entry.benefit),
                ],
                &widths,
            );
        }
    }

    if !summary.top_sold.is_empty() {
        ctx.output.header("Best selling");
        let widths = [40, 10, 10];
        ctx.output.table_header(&["TITLE", "PRICE", "SOLD"], &widths);
        for listing in &summary.top_sold {
            ctx.output.table_row(
                &[
                    &listing.title,
                    &format_price(listing.price),
                    &listing.sold.unwrap_or_default().to_string(),
                ],
                &widths,
            );
        }
    }
}

fn print_histogram(buckets: &[HistogramBucket]) {
    let peak = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);

    for bucket in buckets {
        let len = (bucket.count as usize * BAR_WIDTH) / peak as usize;
        let range = format!(
            "{} - {}",
            format_price(Some(bucket.start)),
            format_price(Some(bucket.end))
        );
        println!(
            "  {:>23}  {} {}",
            truncate(&range, 23),
            style("█".repeat(len)).cyan(),
            style(bucket.count).dim()
        );
    }
}
