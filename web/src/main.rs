use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenv::dotenv;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod admin;
mod config;
mod error;
mod mail;
mod openweather;
mod render;
mod schema;
mod session;
mod site;
mod store;
mod uploads;
mod utils;

use config::ServerConfig;
use mail::Mailer;
use openweather::WeatherClient;
use session::SessionStore;
use store::{MemStore, PgStore, Store};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone)]
pub struct App {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    pub mailer: Mailer,
    pub weather: WeatherClient,
    pub config: Arc<ServerConfig>,
}

impl App {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let http = reqwest::Client::new();
        let mailer = Mailer::new(http.clone(), config.mail_relay.clone());
        let weather = WeatherClient::new(
            http,
            config.weather_api_key.clone(),
            config.weather_api_url.clone(),
        );

        App {
            store,
            sessions: SessionStore::new(),
            mailer,
            weather,
            config: Arc::new(config),
        }
    }
}

pub fn router(app: App) -> Router {
    let uploads_dir = ServeDir::new(&app.config.upload_dir);

    Router::new()
        .merge(site::routes::router())
        .merge(admin::routes::router())
        .nest_service("/uploads", uploads_dir)
        .with_state(app)
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::new_from_env();

    let store: Arc<dyn Store> = match config.database_url.as_deref() {
        Some(url) => match PgStore::connect(url) {
            Ok(pg) => Arc::new(pg),
            Err(e) => {
                tracing::error!(error = %e, "could not set up the database pool");
                std::process::exit(1)
            }
        },
        None => {
            tracing::warn!(
                "DATABASE_URL is not set, using the in-process store; data is lost on restart"
            );
            Arc::new(MemStore::new())
        }
    };

    let port = config.port;
    let app = App::new(store, config);
    let router = router(app).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "could not bind the listen address");
            std::process::exit(1)
        }
    };

    tracing::info!(%addr, "listening");
    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!(error = %e, "server exited");
    }
}
