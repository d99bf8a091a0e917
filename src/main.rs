use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use sea_orm::{ConnectOptions, Database};
use tracing::info;
use tracing_subscriber::EnvFilter;

use migration::{Migrator, MigratorTrait};

use bannerlinker::api::configure_routes;
use bannerlinker::client::HttpBannerApi;
use bannerlinker::config::{get_config, init_config};
use bannerlinker::report::{FsObjectStorage, ReportTask, SeaOrmQueryEngine};
use bannerlinker::services::{BatchProcessor, HttpUrlShortener, LinkGenerator};
use bannerlinker::storage::{SeaOrmBannerStore, SeaOrmRunTracker};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    init_config();
    let config = get_config();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    // 数据库连接 + 自动迁移
    let mut options = ConnectOptions::new(config.database.database_url.clone());
    options.max_connections(config.database.pool_size);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let generator = LinkGenerator::new(
        Arc::new(HttpBannerApi::new(&config.banner_api.endpoint)),
        Arc::new(HttpUrlShortener::new(
            &config.short_url.endpoint,
            config.short_url.secret_key.clone(),
        )),
    );
    let processor = Arc::new(BatchProcessor::new(
        generator,
        Arc::new(SeaOrmBannerStore::new(db.clone())),
        Arc::new(SeaOrmRunTracker::new(db.clone())),
    ));
    let report_task = Arc::new(ReportTask::new(
        Arc::new(SeaOrmQueryEngine::new(db.clone())),
        Arc::new(FsObjectStorage::new(config.report.results_dir.clone())),
        &config.report.bucket_name,
    ));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db.clone()))
            .app_data(web::Data::new(processor.clone()))
            .app_data(web::Data::new(report_task.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
