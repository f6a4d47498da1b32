#[tokio::main]
async fn main() -> anyhow::Result<()> {
    quizcraft::run().await
}
