use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    martbot::run().await
}
