use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("arXiv notifier starting up");

    match notifier::run_arxiv_notifier().await {
        Ok(status) => {
            info!("arXiv notifier completed successfully");
            println!("{}", serde_json::to_string(&status)?);
            Ok(())
        }
        Err(e) => {
            error!("arXiv notifier failed: {}", e);
            Err(e)
        }
    }
}
