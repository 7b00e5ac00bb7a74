use std::sync::Arc;

use anyhow::Result;
use storefront_orderservice::{
    api::MidtransClient,
    app_state::AppState,
    bootstrap,
    config::AppConfig,
    db,
    orders::{OrderService, PgOrderStore},
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let config = AppConfig::load()?;
    let midtrans = config.midtrans.resolve()?;

    tracing::info!("Running migrations...");
    let migrations_count = db::run_migrations_blocking(&config.database.url).await?;
    tracing::info!("Run {} new migrations successfully", migrations_count);

    tracing::info!("Bootstrapping...");
    let db_pool = db::create_pool(&config.database).await?;
    let gateway = MidtransClient::new(&midtrans)?;
    let orders = OrderService::new(
        Arc::new(PgOrderStore::new(db_pool)),
        Arc::new(gateway),
        midtrans.timeout,
    );

    let app = routes::app(
        AppState::new(orders, &config.auth.jwt_secret),
        &config.server.frontend_urls,
    );
    bootstrap::serve(app, &config.server).await
}
