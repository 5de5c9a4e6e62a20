//! Listing search command.

use anyhow::Result;
use shelf_core::search::{SearchQuery, SortOption};

use super::SearchArgs;
use crate::context::Context;
use crate::output::{format_float, format_opt, format_price};

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let sort = SortOption::from_str(&args.sort).unwrap_or_else(|| {
        tracing::warn!(value = %args.sort, "unknown sort order, using newest");
        SortOption::default()
    });
    let per_page = args.per_page.unwrap_or(ctx.config.search.per_page);

    let query = SearchQuery::new(args.criteria.to_criteria())
        .with_sort(sort)
        .with_pagination(args.page, per_page);

    let service = ctx.open_service().await?;
    let spinner = ctx.output.spinner("Searching...");
    let page = service.search(&query).await;
    spinner.finish_and_clear();
    let page = page?;

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    ctx.output.header(&format!("Listings ({})", sort.display_name()));

    if page.is_empty() {
        ctx.output.info("No listings found.");
        return Ok(());
    }

    let title_width = ctx.output.term_width().saturating_sub(50).clamp(20, 60);
    let widths = [title_width, 10, 10, 6, 8];
    ctx.output
        .table_header(&["TITLE", "PRICE", "DISCOUNT", "RATING", "SOLD"], &widths);

    for listing in &page.items {
        ctx.output.table_row(
            &[
                &listing.title,
                &format_price(listing.price),
                &format_price(listing.discount_price),
                &format_float(listing.rating, 1),
                &format_opt(listing.sold),
            ],
            &widths,
        );
    }

    let p = page.pagination;
    println!();
    ctx.output.info(&format!(
        "Showing {}-{} of {} (page {}/{})",
        p.start_item(),
        p.end_item(),
        p.total,
        p.page,
        p.total_pages
    ));
    if p.has_next {
        ctx.output
            .info(&format!("Next page: shelf search --page {}", p.page + 1));
    }

    Ok(())
}
