mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}
