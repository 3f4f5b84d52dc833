use std::sync::Arc;

use anyhow::{anyhow, Result};
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use common::ServerConfig;

use crate::error::GenerationError;
use crate::generator::{GeneratedContent, Generator};

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
}

/// Request body for `/generate-post`.
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

/// JSON error body shared by handlers and catchers.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Error returned by handlers; always rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: Status,
    detail: String,
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self {
            status: Status::InternalServerError,
            detail: err.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        status::Custom(self.status, Json(ErrorBody { detail: self.detail })).respond_to(req)
    }
}

#[get("/")]
async fn root() -> Json<Value> {
    Json(json!({ "message": "Service is running" }))
}

#[get("/heartbeat")]
async fn heartbeat() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Run the whole pipeline for one topic.
#[post("/generate-post", data = "<body>")]
async fn generate_post(
    state: &State<AppState>,
    body: Json<TopicRequest>,
) -> Result<Json<GeneratedContent>, ApiError> {
    let topic = body.into_inner().topic;
    info!(topic = %topic, "generate-post requested");

    match state.generator.generate(&topic).await {
        Ok(content) => Ok(Json(content)),
        Err(e) => {
            error!(topic = %topic, stage = %e.stage(), "content generation failed: {}", e);
            Err(e.into())
        }
    }
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> status::Custom<Json<ErrorBody>> {
    let detail = status.reason().unwrap_or("Unknown error").to_string();
    status::Custom(status, Json(ErrorBody { detail }))
}

/// Build the Rocket instance without launching it, so tests can drive it locally.
pub fn build_rocket(state: AppState, server: &ServerConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", server.address.clone()))
        .merge(("port", server.port));

    rocket::custom(figment)
        .manage(state)
        .mount("/", routes![root, heartbeat, generate_post])
        .register("/", catchers![default_catcher])
}

/// Launch the HTTP server. Blocks until Rocket shuts down (SIGINT/SIGTERM etc.).
pub async fn launch_rocket(state: AppState, server: &ServerConfig) -> Result<()> {
    info!(address = %server.address, port = server.port, "Starting Rocket HTTP server");
    build_rocket(state, server)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    info!("Rocket HTTP server has shut down");
    Ok(())
}
