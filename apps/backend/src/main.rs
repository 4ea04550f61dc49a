#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bashalanka_backend::run().await
}
