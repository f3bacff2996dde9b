use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    flowmap_cli::main_entry().await
}
