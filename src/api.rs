//! # API Server Module
//!
//! ## Purpose
//! REST API server exposing the constitution query operations over HTTP,
//! mirroring the document hierarchy in its route layout.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP GET requests with search, sort and pagination parameters
//! - **Output**: JSON records, pagination envelopes, `{"detail": ...}` errors
//! - **Endpoints**: /constitucion, /titulos, /capitulos, /articulos, /status, /
//!
//! ## Key Features
//! - Read-only surface; every handler delegates to the store
//! - Not-found outcomes map to 404 with a Spanish detail message
//! - Document I/O failures map to 500 without leaking paths
//! - Optional permissive CORS for web frontends

use crate::errors::{ConstitucionError, Result};
use crate::store::ConsultaParams;
use actix_cors::Cors;
use actix_web::{middleware::Condition, web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// REST API server for the constitution store
pub struct ApiServer {
    app_state: crate::AppState,
}

/// Query parameters accepted by the listing endpoints
#[derive(Debug, Deserialize)]
pub struct ListadoQuery {
    pub q: Option<String>,
    pub ordenar_por: Option<String>,
    pub orden: Option<String>,
    pub pagina: Option<i64>,
    pub tamano_pagina: Option<i64>,
}

/// `/capitulos` additionally accepts an optional Title filter
#[derive(Debug, Deserialize)]
pub struct CapitulosQuery {
    pub titulo: Option<String>,
    pub q: Option<String>,
    pub ordenar_por: Option<String>,
    pub orden: Option<String>,
    pub pagina: Option<i64>,
    pub tamano_pagina: Option<i64>,
}

/// Service status payload
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl From<&ListadoQuery> for ConsultaParams {
    fn from(query: &ListadoQuery) -> Self {
        ConsultaParams {
            q: query.q.clone(),
            ordenar_por: query.ordenar_por.clone(),
            orden: query.orden.clone(),
            pagina: query.pagina,
            tamano_pagina: query.tamano_pagina,
        }
    }
}

impl From<&CapitulosQuery> for ConsultaParams {
    fn from(query: &CapitulosQuery) -> Self {
        ConsultaParams {
            q: query.q.clone(),
            ordenar_por: query.ordenar_por.clone(),
            orden: query.orden.clone(),
            pagina: query.pagina,
            tamano_pagina: query.tamano_pagina,
        }
    }
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: crate::AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!(
            "{}:{}",
            self.app_state.config.server.host, self.app_state.config.server.port
        );
        let enable_cors = self.app_state.config.server.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        let app_state = self.app_state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .configure(configure)
        })
        .bind(&bind_addr)
        .map_err(|e| ConstitucionError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        server.await.map_err(|e| ConstitucionError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

/// Route table, shared between the server and handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root_handler))
        .route("/status", web::get().to(status_handler))
        .route("/constitucion", web::get().to(constitucion_handler))
        .route("/titulos", web::get().to(list_titulos_handler))
        .route("/titulos/{titulo_id}", web::get().to(get_titulo_handler))
        .route(
            "/titulos/{titulo_id}/capitulos",
            web::get().to(list_capitulos_de_titulo_handler),
        )
        .route(
            "/titulos/{titulo_id}/capitulos/{capitulo_num}",
            web::get().to(get_capitulo_handler),
        )
        .route("/capitulos", web::get().to(list_capitulos_handler))
        .route("/articulos", web::get().to(list_articulos_handler))
        .route("/articulos/{numero}", web::get().to(get_articulo_handler));
}

/// Map a store error onto the HTTP surface: not-found is an ordinary 404,
/// everything else is logged and answered as an opaque 500.
fn error_response(err: ConstitucionError) -> HttpResponse {
    if err.is_not_found() {
        return HttpResponse::NotFound().json(serde_json::json!({ "detail": err.to_string() }));
    }

    tracing::error!(category = err.category(), error = %err, "request failed");
    HttpResponse::InternalServerError()
        .json(serde_json::json!({ "detail": "Error interno del servidor" }))
}

/// Root banner
async fn root_handler() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Constitución de Panamá API" })))
}

/// Service health
async fn status_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: app_state.started_at,
    }))
}

/// Whole raw document
async fn constitucion_handler(app_state: web::Data<crate::AppState>) -> ActixResult<HttpResponse> {
    match app_state.store.raw_document() {
        Ok(raw) => Ok(HttpResponse::Ok().json(raw.as_ref())),
        Err(e) => Ok(error_response(e)),
    }
}

/// List Titles
async fn list_titulos_handler(
    app_state: web::Data<crate::AppState>,
    query: web::Query<ListadoQuery>,
) -> ActixResult<HttpResponse> {
    match app_state.store.list_titulos(&ConsultaParams::from(&*query)) {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(error_response(e)),
    }
}

/// One Title by Arabic or Roman identifier
async fn get_titulo_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match app_state.store.get_titulo(&path) {
        Ok(titulo) => Ok(HttpResponse::Ok().json(titulo)),
        Err(e) => Ok(error_response(e)),
    }
}

/// Chapters of one Title
async fn list_capitulos_de_titulo_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<String>,
    query: web::Query<ListadoQuery>,
) -> ActixResult<HttpResponse> {
    match app_state
        .store
        .list_capitulos_de_titulo(&path, &ConsultaParams::from(&*query))
    {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(error_response(e)),
    }
}

/// One Chapter within a Title
async fn get_capitulo_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<(String, u32)>,
) -> ActixResult<HttpResponse> {
    let (titulo_id, capitulo_num) = path.into_inner();
    match app_state.store.get_capitulo(&titulo_id, capitulo_num) {
        Ok(capitulo) => Ok(HttpResponse::Ok().json(capitulo)),
        Err(e) => Ok(error_response(e)),
    }
}

/// All Chapters, optionally filtered by Title
async fn list_capitulos_handler(
    app_state: web::Data<crate::AppState>,
    query: web::Query<CapitulosQuery>,
) -> ActixResult<HttpResponse> {
    match app_state
        .store
        .list_capitulos(query.titulo.as_deref(), &ConsultaParams::from(&*query))
    {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(error_response(e)),
    }
}

/// List Articles
async fn list_articulos_handler(
    app_state: web::Data<crate::AppState>,
    query: web::Query<ListadoQuery>,
) -> ActixResult<HttpResponse> {
    match app_state
        .store
        .list_articulos(&ConsultaParams::from(&*query))
    {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(error_response(e)),
    }
}

/// One Article by number
async fn get_articulo_handler(
    app_state: web::Data<crate::AppState>,
    path: web::Path<u32>,
) -> ActixResult<HttpResponse> {
    match app_state.store.get_articulo(*path) {
        Ok(articulo) => Ok(HttpResponse::Ok().json(articulo)),
        Err(e) => Ok(error_response(e)),
    }
}
