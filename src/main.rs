//! Image Transformer - upload images and download transformed variants.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_transformer::{
    config::Config,
    server::{create_router, RouterConfig},
    service::ImageService,
    store::ImageStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Image Transformer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Images directory: {}", config.images_dir.display());
    info!("  Processed directory: {}", config.processed_dir.display());
    info!("  Max upload size: {} bytes", config.max_upload_size);

    let service = ImageService::new(
        ImageStore::new(&config.images_dir),
        ImageStore::new(&config.processed_dir),
    );

    if let Err(e) = service.ensure_stores().await {
        error!("Failed to create storage directories: {}", e);
        return ExitCode::FAILURE;
    }

    let router = create_router(service, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl -F 'image=@photo.jpg;type=image/jpeg' http://{}/upload/", addr);
    info!("    curl -OJ 'http://{}/rotate/photo.jpg?degrees=90'", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_transformer=debug,tower_http=debug"
    } else {
        "image_transformer=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::default()
        .with_max_upload_size(config.max_upload_size)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
