#[tokio::main]
async fn main() -> std::io::Result<()> {
    battle_client::run_with_config().await
}
