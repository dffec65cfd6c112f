#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    if let Err(err) = leadbridge::interfaces::cli::run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
