use anyhow::{Context, Result};
use clap::Parser;
use geoproximity::{
    read_documents, Catalog, CatalogSettings, IndexOptions, QueryContext, SortOptions,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "geoproximity")]
#[command(about = "Sort catalog documents by distance from a center point", long_about = None)]
struct Args {
    /// JSON file holding an array of documents
    #[arg(long, env = "GEOPROXIMITY_DOCUMENTS")]
    documents: PathBuf,

    /// Index name
    #[arg(long, env = "GEOPROXIMITY_INDEX", default_value = "geolocation")]
    index: String,

    /// Comma-separated attributes holding the location (defaults to the index name)
    #[arg(long, env = "GEOPROXIMITY_ATTRS")]
    attrs: Option<String>,

    /// Center latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Center longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Maximum number of results
    #[arg(long, env = "GEOPROXIMITY_LIMIT")]
    limit: Option<usize>,

    /// Farthest first
    #[arg(long)]
    reverse: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting geoproximity v{}", geoproximity::VERSION);

    let docs = read_documents(&args.documents)
        .with_context(|| format!("reading {}", args.documents.display()))?;

    let mut catalog = Catalog::with_settings(CatalogSettings::default().with_metrics(false));
    let options = match &args.attrs {
        Some(attrs) => IndexOptions::new(attrs.as_str()),
        None => IndexOptions::default(),
    };
    catalog.add_index(&args.index, options)?;

    let mut indexed = 0usize;
    for doc in &docs {
        indexed += catalog.catalog_object(doc)?;
    }
    info!(documents = docs.len(), indexed, "catalog loaded");

    let candidates = catalog
        .index(&args.index)
        .map(|index| index.doc_ids())
        .unwrap_or_default();

    let mut sort_options = SortOptions {
        limit: args.limit,
        ..SortOptions::default()
    };
    if args.reverse {
        sort_options = sort_options.reversed();
    }

    let ctx = QueryContext::with_center(args.lat, args.lng);
    let result = catalog.sort_by(&args.index, candidates, &ctx, sort_options)?;

    for hit in &result.hits {
        println!("{}\t{:.3} km", hit.doc_id, hit.key);
    }
    info!(
        hits = result.hits.len(),
        elapsed_us = result.stats.execution_time_us,
        "sort complete"
    );

    Ok(())
}
