/// n8n-entrypoint
///
/// Container entrypoint: supervises the n8n server and imports workflow
/// definitions once its API is up. Exits with the server's exit code, or 1 if
/// the supervisor itself fails.

use n8n_entrypoint::{init_tracing, run, Config};

#[tokio::main]
async fn main() {
    // Configuration comes from the container environment
    let config = Config::default();
    init_tracing(&config);

    let code = match run(config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("❌ Unhandled error in entrypoint: {:#}", e);
            1
        }
    };

    std::process::exit(code);
}
