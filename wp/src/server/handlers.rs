//! Route handlers

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use super::AppState;
use crate::calendar::{DatedDay, now_utc_iso};
use crate::domain::Task;
use crate::planner::PlanError;

/// JSON error envelope with spec'd status mapping
pub struct ApiError(PlanError);

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PlanError::EmptyInput | PlanError::EmptyExtraction => StatusCode::BAD_REQUEST,
            PlanError::MalformedOracleResponse { .. } | PlanError::OracleCallFailure(_) => StatusCode::BAD_GATEWAY,
            PlanError::InvalidWeekId(_) | PlanError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(status = %status, error = %self.0, "request failed");
        (status, Json(error_body(&self.0))).into_response()
    }
}

/// Error payload; malformed oracle responses keep the raw text for diagnosis
fn error_body(err: &PlanError) -> Value {
    let mut body = json!({ "error": err.to_string() });
    if let PlanError::MalformedOracleResponse { raw } = err {
        body["raw"] = json!(raw);
    }
    body
}

/// Template context for the single HTML page
#[derive(Debug, Serialize)]
pub(crate) struct PageContext {
    pub input_text: String,
    pub extracted_pretty: Option<String>,
    pub pending_tasks_json: Option<String>,
    pub week_id: String,
    pub week_version: u64,
    pub weekly_by_date: Vec<DatedDay>,
}

/// `GET /healthz`
pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true, "time": now_utc_iso() }))
}

/// Render the page, or a 500 if the embedded template itself is broken
fn page_response(state: &AppState, context: &PageContext) -> Response {
    match state.render_index(context) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!(error = %e, "failed to render page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Template rendering failed" })),
            )
                .into_response()
        }
    }
}

/// `GET /` - current week, empty form
pub async fn home(State(state): State<AppState>) -> Result<Response, ApiError> {
    let view = state.planner.view_week(&state.default_user)?;
    Ok(page_response(
        &state,
        &PageContext {
            input_text: String::new(),
            extracted_pretty: None,
            pending_tasks_json: None,
            week_id: view.week_id,
            week_version: view.version,
            weekly_by_date: view.days,
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct UiActionForm {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub pending_tasks_json: String,
}

fn default_action() -> String {
    "extract_preview".to_string()
}

/// `POST /ui/action` - the browser form
///
/// Errors render inline as a pretty JSON block with the user's input
/// preserved for re-submission; the page itself always returns 200.
pub async fn ui_action(State(state): State<AppState>, Form(form): Form<UiActionForm>) -> Result<Response, ApiError> {
    let input_text = form.text.trim().to_string();
    debug!(action = %form.action, text_len = input_text.len(), "ui_action: called");

    let mut extracted_pretty: Option<String> = None;
    let mut pending_tasks_json_out: Option<String> = None;

    // Always show the current week, even when the action fails
    let mut view = state.planner.view_week(&state.default_user)?;

    match form.action.as_str() {
        "extract_preview" | "extract" => match state.planner.extract_preview(&input_text).await {
            Ok(extraction) => {
                pending_tasks_json_out = Some(json!({ "tasks": extraction.tasks }).to_string());
                extracted_pretty = Some(pretty(&serde_json::to_value(&extraction).unwrap_or_default()));
            }
            Err(e) => extracted_pretty = Some(pretty(&error_body(&e))),
        },
        "confirm_add" | "add_to_week" => {
            if form.pending_tasks_json.trim().is_empty() {
                extracted_pretty = Some(pretty(&json!({
                    "error": "No extracted tasks to add. Please Extract first."
                })));
            } else {
                match parse_pending(&form.pending_tasks_json) {
                    Ok(new_tasks) => {
                        match state
                            .planner
                            .confirm_add(&state.default_user, new_tasks, "ui_add_to_week")
                            .await
                        {
                            Ok(outcome) => {
                                extracted_pretty = Some(pretty(&json!({
                                    "message": "Tasks added to weekly plan.",
                                    "week_id": outcome.week_id,
                                    "version": outcome.version,
                                    "changes": outcome.changes,
                                    "conflicts": outcome.conflicts,
                                })));
                                // Refresh the display after the commit
                                view = state.planner.view_week(&state.default_user)?;
                            }
                            Err(e) => extracted_pretty = Some(pretty(&error_body(&e))),
                        }
                    }
                    Err(msg) => extracted_pretty = Some(pretty(&json!({ "error": msg }))),
                }
            }
        }
        "view_week" => {
            let plan = state.planner.load_week(&state.default_user)?;
            extracted_pretty = Some(pretty(&serde_json::to_value(&plan).unwrap_or_default()));
        }
        other => {
            extracted_pretty = Some(pretty(&json!({ "error": format!("Unknown action: {}", other) })));
        }
    }

    Ok(page_response(
        &state,
        &PageContext {
            input_text,
            extracted_pretty,
            pending_tasks_json: pending_tasks_json_out,
            week_id: view.week_id,
            week_version: view.version,
            weekly_by_date: view.days,
        },
    ))
}

/// Decode the client-staged `{"tasks": [...]}` blob
fn parse_pending(pending_tasks_json: &str) -> Result<Vec<Task>, String> {
    let value: Value =
        serde_json::from_str(pending_tasks_json).map_err(|_| "Staged task list is not valid JSON.".to_string())?;
    let tasks = value.get("tasks").cloned().unwrap_or(Value::Null);
    serde_json::from_value::<Vec<Task>>(tasks).map_err(|_| "Staged task list is malformed.".to_string())
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[derive(Debug, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub text: String,
}

/// `POST /api/extract`
pub async fn api_extract(
    State(state): State<AppState>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<Value>, ApiError> {
    let extraction = state.planner.extract_preview(payload.text.trim()).await?;
    Ok(Json(serde_json::to_value(&extraction).unwrap_or_default()))
}

/// `GET /api/weekly/get` - the raw stored document
pub async fn api_weekly_get(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let plan = state.planner.load_week(&state.default_user)?;
    Ok(Json(serde_json::to_value(&plan).unwrap_or_default()))
}

/// `POST /api/weekly/add_text` - extract and merge in one call
pub async fn api_weekly_add_text(
    State(state): State<AppState>,
    Json(payload): Json<TextPayload>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .planner
        .add_text(&state.default_user, payload.text.trim(), "api_add_text")
        .await?;
    Ok(Json(json!({
        "message": "Added tasks and updated weekly plan.",
        "week_id": outcome.week_id,
        "version": outcome.version,
        "changes": outcome.changes,
        "conflicts": outcome.conflicts,
        "weekly_plan": outcome.weekly_plan,
    })))
}
