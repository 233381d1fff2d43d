use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use lume_swipe::config::{LoggingSettings, Settings};
use lume_swipe::routes::{self, AppState};
use lume_swipe::services::SessionStore;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path errors (malformed session ids)
pub fn handle_path_error(err: error::PathError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Malformed path {}: {}", req.path(), err);
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging);

    info!("Starting Lume Swipe service...");
    info!(
        "Swipe tuning: threshold {}x width, fly-off {}ms, busy policy {:?}",
        settings.swipe.threshold_fraction,
        settings.swipe.fly_off_duration_ms,
        settings.swipe.busy_policy
    );

    let sessions = SessionStore::from_settings(&settings);

    info!(
        "Session store initialized (max: {} sessions, idle TTL: {}s, realtime: {}, frame: {:?})",
        settings.sessions.max_sessions,
        settings.sessions.idle_ttl_secs,
        settings.sessions.realtime_animation,
        sessions.driver().frame()
    );

    // Build application state
    let app_state = AppState { sessions };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
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

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_malformed_session_id_is_bad_request() {
        let sessions = SessionStore::new(
            10,
            std::time::Duration::from_secs(60),
            Default::default(),
            Default::default(),
            false,
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { sessions }))
                .app_data(web::PathConfig::default().error_handler(handle_path_error))
                .configure(routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/sessions/not-a-uuid").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_path");
        assert_eq!(body["status_code"], 400);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let sessions = SessionStore::new(
            10,
            std::time::Duration::from_secs(60),
            Default::default(),
            Default::default(),
            false,
        );
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState { sessions }))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/sessions")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
