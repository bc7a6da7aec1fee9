//! Beanstalk server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{App, HttpRequest, HttpServer, Result as ActixResult, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use beanstalk_lib::api;
use beanstalk_lib::config::Config;
use beanstalk_lib::db::{MemoryStore, PrdRepository};
use beanstalk_lib::middleware::RequestLogger;
use beanstalk_lib::services::{LanguageModel, OpenAiClient};
use beanstalk_lib::state::AppState;

/// SPA fallback handler - serves index.html for client-side routing.
async fn spa_fallback(req: HttpRequest) -> ActixResult<NamedFile> {
    let static_dir = req
        .app_data::<web::Data<PathBuf>>()
        .ok_or_else(|| actix_web::error::ErrorNotFound("Static dir not configured"))?;
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if Config::from_env().is_ok() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - OPENAI_API_KEY must be set to a language model API key");
            error!("  - In production, OPENAI_BASE_URL must use https");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Beanstalk Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let model: Arc<dyn LanguageModel> = match OpenAiClient::new(&config.llm) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create language model client: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Language model: {} at {} (timeout {}s, {} repair attempts)",
        config.llm.model, config.llm.base_url, config.llm.timeout_secs, config.llm.repair_attempts
    );

    if let Some(dir) = &config.upload_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    let repo: Arc<dyn PrdRepository> = Arc::new(MemoryStore::new());
    let state = match AppState::from_config(&config, repo, model) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Limits: {}MB max upload, {} concurrent generations ({}s queue timeout), codegen mode: {}",
        config.max_upload_size / 1024 / 1024,
        config.max_concurrent_generations,
        config.generation_queue_timeout_secs,
        if config.model_assisted_codegen {
            "model_assisted"
        } else {
            "templated"
        }
    );

    let bind_address = config.bind_address();
    let max_upload_size = config.max_upload_size;
    let static_dir = config.static_dir.clone();
    let is_development = config.is_development();

    if static_dir.is_some() {
        info!("Static file serving enabled from {:?}", static_dir);
    }

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let server = HttpServer::new(move || {
        let cors = if is_development {
            // Vite and CRA dev servers
            Cors::default()
                .allowed_origin("http://localhost:5173")
                .allowed_origin("http://127.0.0.1:5173")
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        let mut app = App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(state.clone())
            // Multipart bodies carry a little framing on top of the document
            .app_data(web::PayloadConfig::new(max_upload_size + 64 * 1024))
            .service(web::scope("/api").configure(api::configure));

        if let Some(ref dir) = static_dir {
            app = app
                .app_data(web::Data::new(dir.clone()))
                .service(Files::new("/assets", dir.join("assets")).prefer_utf8(true))
                .service(Files::new("/favicon", dir.clone()).index_file("favicon.ico"))
                .default_service(web::route().to(spa_fallback));
        }

        app
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
