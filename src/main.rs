use tracing_subscriber::EnvFilter;

use wardbook::web::types::AppContext;
use wardbook::{config, db, web};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    std::fs::create_dir_all(config::media_dir())?;

    let conn = db::open_database(&config::db_path())?;
    let context = AppContext::new(conn, config::media_dir());
    let app = web::app_router(context);

    let addr = config::bind_addr();
    tracing::info!(
        version = config::APP_VERSION,
        %addr,
        data_dir = %data_dir.display(),
        "starting {}",
        config::APP_NAME
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
