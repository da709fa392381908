use layered_chess::ServerConfig;
use layered_chess::web::run_server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("layered_chess=info,tower_http=info")),
        )
        .init();

    println!("Layered Chess - 8 layers, 512 cells");
    println!("===================================");

    let config = ServerConfig::from_env()?;
    run_server(config).await?;

    Ok(())
}
