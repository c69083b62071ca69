use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use rust_edu_platform::cache::ObjectCache;
use rust_edu_platform::config::AppConfig;
use rust_edu_platform::models::AppStartTime;
use rust_edu_platform::routes;
use rust_edu_platform::runtime::lifetime;
use rust_edu_platform::utils::{json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return Err(std::io::Error::other(e.to_string()));
    }
    let config = AppConfig::get();

    // guard 需存活到进程结束，否则缓冲日志会丢失
    let _log_guard = init_logging(config);

    info!(
        "{} v{} ({} environment)",
        config.app.system_name,
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = match lifetime::startup::prepare_server_startup().await {
        Ok(startup) => startup,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    let storage = startup.storage;
    let cache: Arc<dyn ObjectCache> = startup.cache;
    let jwt_config = config.jwt.clone();

    debug!(
        "Startup finished in {} ms, {} workers",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds(),
        config.server.workers
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors.allowed_origins, config.cors.max_age))
            .wrap(Compress::default())
            .wrap(default_headers(config.server.timeouts.keep_alive))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(jwt_config.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(routes::configure_api_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            warn!("Listening on unix:{}", socket_path);
            server.bind_uds(socket_path)?
        }
        None => {
            let address = config.server_bind_address();
            warn!("Listening on http://{}", address);
            server.bind(address)?
        }
    };

    #[cfg(not(unix))]
    let server = {
        let address = config.server_bind_address();
        warn!("Listening on http://{}", address);
        server.bind(address)?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Server stopped");
        }
    }

    Ok(())
}

/// 开发环境输出文件与行号，其余环境输出 JSON
fn init_logging(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true);

    if config.is_development() {
        builder
            .with_ansi(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        builder.with_ansi(false).json().init();
    }
    guard
}

fn default_headers(keep_alive: u64) -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Connection", "keep-alive"))
        .add(("Keep-Alive", format!("timeout={keep_alive}, max=1000")))
        .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
}

/// 未配置来源时允许任意来源
fn build_cors(allowed_origins: &[String], max_age: usize) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(max_age);
    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }
    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
