use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod catalog;
mod config;
mod domain;
mod error;
mod logging;
mod seed;
mod storage;

use crate::catalog::CatalogService;
use crate::config::Config;
use crate::seed::SeedData;
use crate::storage::{DirectoryStore, InMemoryStore};

#[derive(Parser)]
#[command(name = "store_directory")]
#[command(about = "Store directory catalog: slugs, reviews, and rankings")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the built-in sample data in memory and print both reports
    Demo,
    /// Load a JSON seed file and print tag counts and top stores
    Report {
        /// Path to the seed file (users/stores/reviews)
        #[arg(long)]
        seed: PathBuf,
        /// Override the configured top-stores limit
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the normalized base slug for a name
    Slug { name: String },
}

async fn run_reports(data: SeedData, limit: Option<usize>) -> anyhow::Result<()> {
    let storage: Arc<dyn DirectoryStore> = Arc::new(InMemoryStore::new());
    let config = Config::load()?;
    let catalog = CatalogService::with_config(storage.clone(), config);

    let summary = seed::apply(&catalog, storage.as_ref(), data).await?;
    println!(
        "🌱 Seeded {} users, {} stores, {} reviews\n",
        summary.users, summary.stores, summary.reviews
    );

    println!("🏷️  Tag popularity:");
    for tag_count in catalog.tag_counts().await? {
        println!("   {:>4}  {}", tag_count.count, tag_count.tag);
    }

    println!("\n⭐ Top stores:");
    let ranked = catalog.top_stores(limit).await?;
    if ranked.is_empty() {
        println!("   (no store has more than one review yet)");
    }
    for (position, store) in ranked.iter().enumerate() {
        println!(
            "   {}. {} — {:.2} across {} reviews (/store/{})",
            position + 1,
            store.name,
            store.average_rating,
            store.reviews.len(),
            store.slug
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => {
            println!("📇 Running directory demo...");
            run_reports(SeedData::demo(), None).await?;
        }
        Commands::Report { seed: seed_path, limit } => {
            info!("Loading seed file {}", seed_path.display());
            let data = seed::load(&seed_path)?;
            run_reports(data, limit).await?;
        }
        Commands::Slug { name } => {
            let base = catalog::slugs::base_slug(&name);
            if base.is_empty() {
                eprintln!("⚠️  '{}' normalizes to an empty slug", name);
                std::process::exit(1);
            }
            println!("{}", base);
        }
    }
    Ok(())
}
