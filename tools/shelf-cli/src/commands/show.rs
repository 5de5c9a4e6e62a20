//! Single listing lookup.

use anyhow::{bail, Result};

use super::ShowArgs;
use crate::context::Context;
use crate::output::{format_float, format_opt, format_price};

/// Run the show command.
pub async fn run(args: ShowArgs, ctx: &Context) -> Result<()> {
    let service = ctx.open_service().await?;

    let Some(listing) = service.find_by_url(&args.url).await? else {
        bail!("No listing found for url: {}", args.url);
    };

    if ctx.output.is_json() {
        ctx.output.json(&listing);
        return Ok(());
    }

    ctx.output.header(&listing.title);
    ctx.output.kv("id", listing.id.as_str());
    ctx.output.kv("url", &listing.url);
    ctx.output.kv("price", &format_price(listing.price));
    ctx.output.kv("discount price", &format_price(listing.discount_price));
    ctx.output.kv("rating", &format_float(listing.rating, 1));
    ctx.output.kv("ratings", &format_opt(listing.rating_count));
    ctx.output.kv("sold", &format_opt(listing.sold));
    ctx.output.kv("keyword", &listing.keyword);
    ctx.output.kv("created", &listing.created_at.to_rfc3339());
    if let Some(ref image) = listing.image {
        ctx.output.kv("image", image);
    }
    if let Some(ref description) = listing.description {
        ctx.output.kv("description", description);
    }

    Ok(())
}
