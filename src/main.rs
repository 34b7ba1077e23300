use clap::Parser;
use pp_processor::{args::Args, database::db::DbClient, model::rating_model::RatingModel};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let client = DbClient::connect(args.connection_string.as_str())
        .await
        .expect("Expected valid database connection");

    let players = client.get_players().await.expect("Expected player fetch to succeed");

    let mut model = RatingModel::new();
    let ratings = model.recompute(&players);
    info!("Recomputed ratings for {} players", ratings.len());

    if args.dry_run {
        info!("Dry run, skipping persistence");
        return;
    }

    client
        .save_ratings(&ratings)
        .await
        .expect("Expected rating batch to persist");

    info!("Rank recomputation complete");
}
