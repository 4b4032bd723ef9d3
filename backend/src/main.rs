use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use backend::config::Config;
use backend::manager::Manager;
use backend::state::AppState;
use backend::store::SqliteStore;
use backend::{services, session};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;
    let store = SqliteStore::open(&config.database_path).map_err(io::Error::other)?;
    info!("using database {}", config.database_path.display());

    let manager = Manager::new(Arc::new(store)).with_preserved_tokens(config.preserve_tokens);
    let state = AppState::new(manager, &config);
    let session_key = session::session_key(&config);
    let cookie_secure = config.cookie_secure;

    let url = format!("http://{}:{}", config.host, config.port);
    info!("Check-in server running at {}", url);

    HttpServer::new(move || {
        App::new()
            .wrap(session::middleware(session_key.clone(), cookie_secure))
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .service(services::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
