use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use rental_listings::auth::TokenDecoder;
use rental_listings::config::{LoggingSettings, Settings};
use rental_listings::error::{handle_json_payload_error, handle_query_payload_error};
use rental_listings::routes::{self, AppState};
use rental_listings::services::{GeocodingClient, ListingStore, MemoryStore, PostgresStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // LOG_LEVEL / LOG_FORMAT win over the config file
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io_error("Configuration error", e)
    })?;

    init_logging(&settings.logging);

    info!("Starting rental listings service...");

    let store: Arc<dyn ListingStore> = if settings.database.is_memory() {
        warn!("Using in-memory listing store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        let postgres = PostgresStore::from_settings(&settings.database)
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                io_error("PostgreSQL connection error", e)
            })?;
        info!("PostgreSQL store initialized");
        Arc::new(postgres)
    };

    let geocoder = GeocodingClient::from_settings(&settings.geocoding).map_err(|e| {
        error!("Failed to build geocoding client: {}", e);
        io_error("Geocoding client error", e)
    })?;

    info!("Geocoding client initialized ({})", settings.geocoding.endpoint);

    let token_decoder = web::Data::new(TokenDecoder::new(settings.auth.jwt_secret.as_deref()));
    if !token_decoder.verifies_signatures() {
        warn!("No JWT secret configured; bearer tokens are decoded without signature verification");
    }

    let app_state = web::Data::new(AppState {
        store,
        geocoder: Arc::new(geocoder),
    });

    let allowed_origins = settings.cors.allowed_origins.clone();
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "HEAD", "PUT", "PATCH", "POST", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials();

        App::new()
            .app_data(app_state.clone())
            .app_data(token_decoder.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
