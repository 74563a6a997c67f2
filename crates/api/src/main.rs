use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bibloteka_observability::init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));
    std::fs::create_dir_all(&data_dir)?;
    let db_path = data_dir.join("bibloteka.db");

    let services = bibloteka_api::app::services::AppServices::open(&db_path).await?;
    let app = bibloteka_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, db = %db_path.display(), "bibloteka listening");

    axum::serve(listener, app).await?;
    Ok(())
}
