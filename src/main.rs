use anyhow::Result;
use hrdesk::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
