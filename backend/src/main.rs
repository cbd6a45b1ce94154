use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use foodshare_backend::config::Config;
use foodshare_backend::services;
use foodshare_backend::state::AppState;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();

    let state = AppState::from_config(&config).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);
    let static_dir = config.static_dir.clone();

    info!("Server running at http://{}:{}", config.host, config.port);
    if let Some(dir) = &static_dir {
        info!("Serving static files from {}", dir.display());
    }

    HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(services::configure);
        match &static_dir {
            Some(dir) => app.service(Files::new("/", dir.clone()).index_file("index.html")),
            None => app,
        }
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
