use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tacet::Shape;
use tacet::config::{Mode, Outline, Params, ServerConfig, StarProfile};
use tacet::render::{ColorError, Export, Style};
use tacet::rng::{SeededRandom, ThreadRandom};

#[derive(Deserialize, Default)]
struct ShapeRequest {
    mode: Option<Mode>,
    // Geometry
    line_length: Option<f64>,
    max_amplitude: Option<f64>,
    segments: Option<usize>,
    sharpness: Option<f64>,
    // Noise
    noise_amount: Option<f64>,
    seed: Option<u64>,
    seeded: Option<bool>,
    // Display
    color: Option<String>,
    show_guides: Option<bool>,
    outline: Option<Outline>,
    // Star tuning
    classic: Option<bool>,
    jitter: Option<bool>,
}

impl ShapeRequest {
    fn into_params(self) -> Params {
        let defaults = Params::for_mode(self.mode.unwrap_or_default());
        let mut star = if self.classic.unwrap_or(false) {
            StarProfile::classic()
        } else {
            defaults.star.clone()
        };
        star.jitter = self.jitter.unwrap_or(star.jitter);

        Params {
            mode: defaults.mode,
            line_length: self.line_length.unwrap_or(defaults.line_length),
            max_amplitude: self.max_amplitude.unwrap_or(defaults.max_amplitude),
            segments: self.segments.unwrap_or(defaults.segments),
            sharpness: self.sharpness.unwrap_or(defaults.sharpness),
            noise_amount: self.noise_amount.unwrap_or(defaults.noise_amount),
            seed: self.seed.unwrap_or(defaults.seed),
            color: self.color.unwrap_or(defaults.color),
            show_guides: self.show_guides.unwrap_or(defaults.show_guides),
            outline: self.outline.unwrap_or(defaults.outline),
            star,
        }
    }
}

#[derive(Serialize)]
struct ShapeResponse {
    #[serde(flatten)]
    shape: Shape,
    svg: String,
    data_url: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("shape task failed: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Color(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Compute off the async runtime, as one consistent snapshot of shape and
/// export.
async fn compute(req: ShapeRequest) -> Result<(Shape, Export), ApiError> {
    let seeded = req.seeded.unwrap_or(true);
    let params = req.into_params();
    let style = Style::from_params(&params)?;

    tokio::task::spawn_blocking(move || {
        let shape = if seeded {
            tacet::compute_shape(&params, &mut SeededRandom::new(params.seed))
        } else {
            tacet::compute_shape(&params, &mut ThreadRandom::new())
        };
        let export = Export::snapshot(&shape, &style);
        (shape, export)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn shape_handler(Json(req): Json<ShapeRequest>) -> Result<Json<ShapeResponse>, ApiError> {
    let (shape, export) = compute(req).await?;
    Ok(Json(ShapeResponse {
        shape,
        data_url: export.data_url(),
        svg: export.body,
    }))
}

async fn export_handler(Json(req): Json<ShapeRequest>) -> Result<Response, ApiError> {
    let (_, export) = compute(req).await?;
    info!("export {} ({} bytes)", export.file_name, export.body.len());
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, export.mime.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

fn app() -> Router {
    Router::new()
        .route("/api/shape", post(shape_handler))
        .route("/api/export", post(export_handler))
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    info!("tacet server at http://{}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app()).await?;
    Ok(())
}
