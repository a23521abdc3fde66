// Price Performance Chart - Publish Server
// Serves the munged data files and the static chart site from the web directory

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use price_performance::{latest_data_file, Config, ProductType, DEFAULT_CONFIG_FILE};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Shared application state
#[derive(Clone)]
struct AppState {
    web_dir: Arc<PathBuf>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            error: Some(message),
        }
    }
}

fn error_response(status: StatusCode, message: String) -> axum::response::Response {
    eprintln!("Error: {}", message);
    (status, Json(ApiResponse::err(message))).into_response()
}

fn read_rows(path: &std::path::Path) -> Result<serde_json::Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/latest/:type - Rows from the newest data file for a product type
async fn get_latest(State(state): State<AppState>, Path(product): Path<String>) -> impl IntoResponse {
    let product: ProductType = match product.parse() {
        Ok(product) => product,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match latest_data_file(&state.web_dir, product) {
        Ok(Some(path)) => match read_rows(&path) {
            Ok(rows) => (StatusCode::OK, Json(ApiResponse::ok(rows))).into_response(),
            Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
        },
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("No {} data files yet", product.name())),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET /api/data/:file - Rows from a specific data file
async fn get_data_file(State(state): State<AppState>, Path(file): Path<String>) -> impl IntoResponse {
    // Decode URL-encoded file name
    let decoded = urlencoding::decode(&file)
        .unwrap_or_else(|_| file.clone().into())
        .into_owned();

    // File names only, no paths
    if decoded.contains('/') || decoded.contains('\\') || !decoded.starts_with("price_performance_") {
        return error_response(StatusCode::BAD_REQUEST, format!("Not a data file: {}", decoded));
    }

    let path = state.web_dir.join(&decoded);
    if !path.exists() {
        return error_response(StatusCode::NOT_FOUND, format!("No such data file: {}", decoded));
    }

    match read_rows(&path) {
        Ok(rows) => (StatusCode::OK, Json(ApiResponse::ok(rows))).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌐 Price Performance Chart - Publish Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = Config::load_or_default(DEFAULT_CONFIG_FILE)?;
    price_performance::init_logging(&config.log_level)?;

    if !config.web_dir.exists() {
        eprintln!("❌ Web directory not found at {:?}", config.web_dir);
        eprintln!("   Run: price-performance cpu munge");
        eprintln!("   to produce data files first.");
        std::process::exit(1);
    }
    println!("✓ Serving data from: {:?}", config.web_dir);

    let state = AppState {
        web_dir: Arc::new(config.web_dir.clone()),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/latest/:type", get(get_latest))
        .route("/data/:file", get(get_data_file))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(config.web_dir.clone()))
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API:    http://localhost:3000/api/latest/cpu");
    println!("   Static: http://localhost:3000/static/");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
