use std::time::Duration;

use actix_web::{App, HttpServer, middleware, web};
use sqlx::PgPool;

use learnhub::config::AppConfig;
use learnhub::db;
use learnhub::errors::AppError;
use learnhub::handlers::validation_handlers;
use learnhub::registration::ValidationSettings;
use learnhub::throttle::RateLimiter;

const THROTTLE_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool).await.map_err(std::io::Error::other)?;

    let settings = ValidationSettings {
        username_charset: config.username_charset(),
    };
    log::info!("Username character set: {:?}", settings.username_charset);

    let limiter = RateLimiter::new(config.validation_rate_limit, config.validation_rate_window);
    {
        let limiter = limiter.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(THROTTLE_PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                limiter.prune();
            }
        });
    }

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(settings))
            .app_data(web::Data::new(limiter.clone()))
            .configure(validation_handlers::configure::<PgPool>)
            .default_service(web::to(|| async {
                Err::<actix_web::HttpResponse, _>(AppError::NotFound)
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
