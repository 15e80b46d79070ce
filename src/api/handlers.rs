//! Viewer request handlers

use std::sync::{Arc, MutexGuard};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::server::AppState;
use crate::controller::Controller;
use crate::error::SieveError;
use crate::filter::{FilterMode, FilterSpec};
use crate::render::{html, HtmlRenderer};

/// Standard JSON response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a library error to a status code and JSON body
fn error_response(e: SieveError) -> Response {
    let status = match e {
        SieveError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        SieveError::UnknownSheet(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::<()>::err(e.to_string()))).into_response()
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, Controller<HtmlRenderer>>, Response> {
    state.controller.lock().map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::err("controller lock poisoned")),
        )
            .into_response()
    })
}

/// GET / - the table page with its controls
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    match lock(&state) {
        Ok(controller) => Html(page(&state.source, &controller)).into_response(),
        Err(response) => response,
    }
}

/// Health check response
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub ready: bool,
    pub version: String,
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let ready = match lock(&state) {
        Ok(controller) => controller.is_ready(),
        Err(response) => return response,
    };
    Json(ApiResponse::ok(HealthResponse {
        status: if ready { "ready" } else { "loading" }.to_string(),
        ready,
        version: state.version.clone(),
    }))
    .into_response()
}

/// Sheet listing
#[derive(Serialize, Debug)]
pub struct SheetsResponse {
    pub primary: String,
    pub subsheets: Vec<String>,
}

/// GET /sheets
pub async fn sheets(State(state): State<Arc<AppState>>) -> Response {
    let controller = match lock(&state) {
        Ok(controller) => controller,
        Err(response) => return response,
    };
    match controller.session() {
        Some(session) => Json(ApiResponse::ok(SheetsResponse {
            primary: session.workbook().primary_sheet().to_string(),
            subsheets: session.subsheet_names().to_vec(),
        }))
        .into_response(),
        None => error_response(SieveError::NotReady),
    }
}

/// Filter form fields
#[derive(Deserialize, Debug, Default)]
pub struct FilterForm {
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub columns: String,
    #[serde(default)]
    pub mode: String,
    /// Present (any value) when the checkbox is ticked
    pub coerce_falsy: Option<String>,
}

impl FilterForm {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::new(&self.primary, &self.columns, FilterMode::parse(&self.mode))
            .with_coerce_falsy(self.coerce_falsy.is_some())
    }
}

/// POST /filter
pub async fn filter(State(state): State<Arc<AppState>>, Form(form): Form<FilterForm>) -> Response {
    let mut controller = match lock(&state) {
        Ok(controller) => controller,
        Err(response) => return response,
    };
    match controller.apply_filter(&form.to_spec()) {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => error_response(e),
    }
}

/// Subsheet form fields
#[derive(Deserialize, Debug, Default)]
pub struct SubsheetForm {
    #[serde(default)]
    pub name: String,
}

/// POST /subsheet - an empty name goes back to the primary sheet
pub async fn subsheet(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubsheetForm>,
) -> Response {
    let mut controller = match lock(&state) {
        Ok(controller) => controller,
        Err(response) => return response,
    };
    match controller.select_subsheet(Some(&form.name)) {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => error_response(e),
    }
}

/// Download query parameters
#[derive(Deserialize, Debug, Default)]
pub struct DownloadQuery {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub format: String,
}

/// GET /download - the filter result as an attachment.
///
/// Unknown formats answer `204 No Content`.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    let controller = match lock(&state) {
        Ok(controller) => controller,
        Err(response) => return response,
    };
    match controller.export(&query.filename, &query.format) {
        Ok(Some(download)) => (
            [
                (
                    header::CONTENT_TYPE,
                    download.format.content_type().to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&download.file_name),
                ),
            ],
            download.bytes,
        )
            .into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// `attachment` disposition for `file_name`, without quotes or control
/// characters that would break the header
fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| *c != '"' && !c.is_control())
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

/// The full page: controls on top, the last rendered table below
pub fn page(source: &str, controller: &Controller<HtmlRenderer>) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>\n", html::escape(source)));

    let Some(session) = controller.session() else {
        body.push_str("<p>Loading workbook...</p>\n<fieldset disabled>\n");
        body.push_str(&controls(&[]));
        body.push_str("</fieldset>\n");
        return html::document(source, &body);
    };

    body.push_str(&controls(session.subsheet_names()));
    body.push_str(&format!(
        "<div id=\"sheet-content\">\n{}\n</div>\n",
        controller.renderer().content()
    ));
    html::document(source, &body)
}

fn controls(subsheets: &[String]) -> String {
    let mut out = String::new();

    out.push_str(concat!(
        "<form method=\"post\" action=\"/filter\">\n",
        "<input name=\"primary\" placeholder=\"Primary column\">\n",
        "<input name=\"columns\" placeholder=\"Operation columns (comma-separated)\">\n",
        "<select name=\"mode\"><option value=\"null\">null</option>",
        "<option value=\"not-null\">not null</option></select>\n",
        "<label><input type=\"checkbox\" name=\"coerce_falsy\"> treat 0 / empty as null</label>\n",
        "<button type=\"submit\">Apply</button>\n",
        "</form>\n",
    ));

    out.push_str("<form method=\"post\" action=\"/subsheet\">\n<select name=\"name\">");
    out.push_str("<option value=\"\">(primary sheet)</option>");
    for name in subsheets {
        let name = html::escape(name);
        out.push_str(&format!("<option value=\"{}\">{}</option>", name, name));
    }
    out.push_str("</select>\n<button type=\"submit\">Show</button>\n</form>\n");

    out.push_str(concat!(
        "<form method=\"get\" action=\"/download\">\n",
        "<input name=\"filename\" placeholder=\"download\">\n",
        "<select name=\"format\"><option value=\"xlsx\">xlsx</option>",
        "<option value=\"csv\">csv</option></select>\n",
        "<button type=\"submit\">Download</button>\n",
        "</form>\n",
    ));
    out
}
