use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    webheal_cli::cli::run().await
}
