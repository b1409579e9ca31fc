use std::path::Path;

use actix_identity::IdentityMiddleware;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;

use melodic::config::Config;
use melodic::utils::session::session_middleware;
use melodic::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    // sqlite creates the file but not its directory.
    if let Some(file) = config.database_url.strip_prefix("sqlite://") {
        if let Some(dir) = Path::new(file).parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
    }

    let pool = db::connect(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!("connected to {}", config.database_url);

    let session_key = config.session_key.clone();
    let secure_cookies = config.secure_cookies;

    log::info!("listening on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(IdentityMiddleware::default())
            .wrap(session_middleware(session_key.clone(), secure_cookies))
            .wrap(Logger::default())
            .configure(handlers::init_routes)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
