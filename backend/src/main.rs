mod config;
mod memo;
mod rpc;
mod service;
mod store;

use anyhow::Context as _;
use clap::Parser as _;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::Config::parse();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Could not connect to the DB")?;
    log::info!(
        "connected to the DB, pool of up to {} connections",
        config.max_connections
    );

    let message_limit = rpc::MessageLimit(config.max_message_bytes);
    let memo_service = actix_web::web::Data::new(service::MemoService::new(std::sync::Arc::new(
        store::PgMemoStore::new(pool),
    )));

    log::info!(
        "{} listening on {}:{}",
        common::SERVICE_NAME,
        config.host,
        config.port
    );
    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .app_data(memo_service.clone())
            .app_data(message_limit)
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_cors::Cors::permissive())
            .configure(rpc::configure)
    })
    .bind_auto_h2c((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
