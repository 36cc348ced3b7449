//! # Storefront CLI
//!
//! Walks the API's list endpoints page by page, the same way the apps'
//! list screens do, and prints the accumulated items as JSON lines.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use storefront::{
    AppContext,
    config::ConfigLoader,
    models::OrderStatus,
    paging::{PageFetcher, Pager},
    repositories::{CategoryFilter, OrderFilter, ProductFilter},
    telemetry::{self, TraceContext},
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Storefront API list client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a resource, following pagination
    List(ListArgs),
    /// Print the loaded configuration with secrets redacted
    Config,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(value_enum)]
    resource: Resource,
    /// Page size (defaults to STOREFRONT_PAGE_SIZE)
    #[arg(long)]
    size: Option<u32>,
    /// Stop after this many pages
    #[arg(long)]
    page_limit: Option<u32>,
    /// Order status filter (orders, history)
    #[arg(long)]
    status: Option<String>,
    /// Category filter (products)
    #[arg(long)]
    category: Option<i64>,
    /// Free-text search (products, categories)
    #[arg(long)]
    search: Option<String>,
    /// Product whose reviews to list (reviews)
    #[arg(long)]
    product: Option<i64>,
    /// Customer whose orders to list (history)
    #[arg(long)]
    customer: Option<i64>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Resource {
    Orders,
    History,
    Products,
    Categories,
    Reviews,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config).context("initializing telemetry")?;

    match cli.command {
        Command::Config => {
            println!("{}", config.redacted_json()?);
            Ok(())
        }
        Command::List(args) => {
            if let Some(size) = args.size {
                config.page_size = size;
                config.validate().context("invalid --size")?;
            }
            let context = AppContext::new(config).context("building API client")?;
            telemetry::with_trace_context(TraceContext::generate(), list(&context, args)).await
        }
    }
}

async fn list(context: &AppContext, args: ListArgs) -> Result<()> {
    let status = args
        .status
        .as_deref()
        .map(|s| OrderStatus::parse(s).ok_or_else(|| anyhow!("unknown order status '{}'", s)))
        .transpose()?;

    match args.resource {
        Resource::Orders => {
            let filter = status.map(OrderFilter::status);
            drain(context.pager(context.orders(), filter), args.page_limit).await
        }
        Resource::History => {
            let customer = args
                .customer
                .context("--customer is required for history")?;
            let filter = status.map(OrderFilter::status);
            drain(
                context.pager(context.order_history(customer), filter),
                args.page_limit,
            )
            .await
        }
        Resource::Products => {
            let filter = (args.category.is_some() || args.search.is_some()).then(|| ProductFilter {
                category_id: args.category,
                search: args.search.clone(),
            });
            drain(context.pager(context.products(), filter), args.page_limit).await
        }
        Resource::Categories => {
            let filter = args.search.clone().map(|search| CategoryFilter {
                search: Some(search),
            });
            drain(context.pager(context.categories(), filter), args.page_limit).await
        }
        Resource::Reviews => {
            let product = args.product.context("--product is required for reviews")?;
            drain(context.pager(context.reviews(product), None), args.page_limit).await
        }
    }
}

async fn drain<P>(pager: Pager<P>, page_limit: Option<u32>) -> Result<()>
where
    P: PageFetcher,
    P::Item: Serialize,
{
    let total = pager.load_all(page_limit).await?;
    let state = pager.into_state();
    info!(
        loaded = total,
        server_total = state.total_items(),
        more = state.can_load_more(),
        "Listing finished"
    );
    for item in state.items() {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}
