use skla::presentation::cli::CliApp;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let app = CliApp::new();
    app.run().await
}
