use clap::Parser;

fn main() {
    // Initialize Sentry before anything else so panics during startup are captured.
    // Returns a no-op guard when SENTRY_DSN is absent (local dev).
    let _sentry_guard = sentry::init(aisensy::logging::sentry_options());

    aisensy::logging::init();
    let cli = aisensy::cli::Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(aisensy::cli::run(cli)) {
        tracing::error!(kind = e.kind(), "{}", e);
        eprintln!(
            "{}",
            serde_json::to_string(&e).unwrap_or_else(|_| e.to_string())
        );
        std::process::exit(1);
    }
}
