use actix_cors::Cors;
use actix_web::http::header;
use actix_web::web;
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing_actix_web::TracingLogger;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use panel::{bootstrap, config, http, App};

/// Expose the panel API HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

#[derive(Debug, Error)]
#[error("Failed to start HTTP server")]
pub struct StartServerError;

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = config::Server::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    init_telemetry();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.workers)
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(serve(config))
}

impl ServerCommand {
    // override server configuration if set by the cli
    fn override_config(&self, config: &mut config::Server) {
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers.get();
        }
    }
}

fn init_telemetry() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .init();
}

async fn serve(config: config::Server) -> Result<(), StartServerError> {
    let app = App::new(config).change_context(StartServerError)?;

    app.pool.migrate().await.change_context(StartServerError)?;
    bootstrap::run(&app).await.change_context(StartServerError)?;

    let addr = (app.config.ip, app.config.port);
    let workers = app.config.workers;
    tracing::info!("listening on http://{}:{}", addr.0, addr.1);

    let data = web::Data::new(app);
    actix_web::HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&data.config.allowed_origin)
            .allowed_methods(["GET", "POST", "PUT", "DELETE"])
            .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials();

        actix_web::App::new()
            .app_data(data.clone())
            .app_data(http::json_config())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(http::controllers::configure)
            .default_service(web::route().to(http::not_found))
    })
    .workers(workers)
    .bind(addr)
    .change_context(StartServerError)
    .attach_printable("could not bind to the configured address")?
    .run()
    .await
    .change_context(StartServerError)
}
