use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brightdata_client::SnapshotClient;
use snapshot_service::{health, Config, Reconciler, Scheduler};
use supabase_client::BookmarkStoreClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("snapshot_service=info".parse()?),
        )
        .init();

    info!("Snapshot reconciliation service starting...");

    let config = Config::from_env()?;
    config.log_redacted();

    if let Some(port) = config.health_port {
        health::spawn(port).await?;
    }

    let fetcher = SnapshotClient::new(config.brightdata_token.clone());
    let store = BookmarkStoreClient::new(
        &config.supabase_project_ref,
        config.supabase_service_role_key.clone(),
    );

    let reconciler = Reconciler::new(fetcher, store);
    let scheduler = Scheduler::new(config.poll_interval, config.run_mode());
    scheduler.run(&reconciler).await?;

    info!("Snapshot reconciliation service stopped");
    Ok(())
}
