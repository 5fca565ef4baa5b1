//! JSON-over-HTTP surface of the room service plus the live websocket route.

mod live;

use crate::access::Credentials;
use crate::error::{ErrorKind, PokerError};
use crate::history::latest_moves;
use crate::model::{Move, RoomHash, SubjectId};
use crate::service::PokerService;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PokerService>,
}

impl AppState {
    pub fn new(service: PokerService) -> Self {
        AppState {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/subjects", get(subjects_handler))
        .route("/api/v1/rooms", post(create_room_handler))
        .route("/api/v1/rooms/{room_hash}", get(room_handler))
        .route("/api/v1/rooms/{room_hash}/players", post(join_room_handler))
        .route(
            "/api/v1/rooms/{room_hash}/players/{player_name}",
            delete(leave_room_handler),
        )
        .route("/api/v1/rooms/{room_hash}/rounds", post(start_round_handler))
        .route(
            "/api/v1/rooms/{room_hash}/rounds/{subject_id}",
            get(get_round_handler).patch(close_round_handler),
        )
        .route(
            "/api/v1/rooms/{room_hash}/rounds/{subject_id}/moves",
            post(submit_move_handler),
        )
        .route("/api/v1/rooms/{room_hash}/report", get(report_handler))
        .route("/api/v1/rooms/{room_hash}/current", get(current_round_handler))
        .route("/api/v1/rooms/{room_hash}/roster", get(roster_handler))
        .route("/api/v1/rooms/{room_hash}/live", get(live::live_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for PokerError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
            ErrorKind::Conflict | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            PokerError::Internal(detail) => {
                error!(%detail, "internal server error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// `Json` whose rejections answer with the `{"message"}` error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(PokerError))]
pub struct ApiJson<T>(pub T);

/// `Path` whose rejections answer with the `{"message"}` error body.
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(PokerError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for PokerError {
    fn from(rejection: JsonRejection) -> Self {
        PokerError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for PokerError {
    fn from(rejection: PathRejection) -> Self {
        PokerError::InvalidRequest(rejection.body_text())
    }
}

fn parse_subject_id(raw: i64) -> Result<SubjectId, PokerError> {
    SubjectId::try_from(raw).map_err(|_| PokerError::InvalidSubject(raw))
}

/// A vote option must be present and a string; anything else is an invalid move.
fn vote_option<'a>(name: &str, value: &'a Option<Value>) -> Result<&'a str, PokerError> {
    value
        .as_ref()
        .and_then(Value::as_str)
        .ok_or_else(|| PokerError::InvalidMove(format!("{} must be a string", name)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub organizer_name: String,
    #[serde(default)]
    pub profile: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_hash: RoomHash,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub player_name: String,
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRoundRequest {
    pub organizer_name: String,
    pub subject_id: i64,
    pub password: String,
}

/// `future` and `mood` are taken as raw JSON so that missing or mistyped
/// values surface as invalid moves.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMoveRequest {
    pub player_name: String,
    #[serde(default)]
    pub future: Option<Value>,
    #[serde(default)]
    pub mood: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRoundRequest {
    pub organizer_name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct MoveAccepted {
    message: String,
    #[serde(rename = "move")]
    played: Move,
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn subjects_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.subjects().clone())
}

async fn create_room_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRoomRequest>,
) -> Result<impl IntoResponse, PokerError> {
    let room_hash = state
        .service
        .create_room(&request.organizer_name, &request.profile, &request.password)
        .await?;
    Ok(Json(CreateRoomResponse { room_hash }))
}

async fn room_handler(
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
) -> Result<impl IntoResponse, PokerError> {
    let view = state.service.get_room(&RoomHash::from(room_hash)).await?;
    Ok(Json(view))
}

async fn join_room_handler(
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
    ApiJson(request): ApiJson<JoinRoomRequest>,
) -> Result<impl IntoResponse, PokerError> {
    state
        .service
        .join_room(
            &RoomHash::from(room_hash),
            &request.player_name,
            &request.profile,
            &request.password,
        )
        .await?;
    Ok(Json(json!({ "message": "Joined room successfully" })))
}

async fn leave_room_handler(
    State(state): State<AppState>,
    ApiPath((room_hash, player_name)): ApiPath<(String, String)>,
) -> Result<impl IntoResponse, PokerError> {
    state
        .service
        .leave_room(&RoomHash::from(room_hash), &player_name)
        .await?;
    Ok(Json(json!({ "message": "Left room" })))
}

async fn start_round_handler(
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
    ApiJson(request): ApiJson<StartRoundRequest>,
) -> Result<impl IntoResponse, PokerError> {
    let subject_id = parse_subject_id(request.subject_id)?;
    let credentials = Credentials::new(request.organizer_name, request.password);
    let round = state
        .service
        .start_round(&RoomHash::from(room_hash), subject_id, &credentials)
        .await?;
    Ok(Json(json!({
        "message": format!("Round {} started", round.subject_id),
    })))
}

async fn submit_move_handler(
    State(state): State<AppState>,
    ApiPath((room_hash, raw_subject)): ApiPath<(String, i64)>,
    ApiJson(request): ApiJson<SubmitMoveRequest>,
) -> Result<impl IntoResponse, PokerError> {
    let subject_id = parse_subject_id(raw_subject)?;
    let future = vote_option("future", &request.future)?;
    let mood = vote_option("mood", &request.mood)?;
    let played = state
        .service
        .submit_move(
            &RoomHash::from(room_hash),
            subject_id,
            &request.player_name,
            future,
            mood,
        )
        .await?;
    Ok(Json(MoveAccepted {
        message: "Move recorded".to_string(),
        played,
    }))
}

async fn close_round_handler(
    State(state): State<AppState>,
    ApiPath((room_hash, raw_subject)): ApiPath<(String, i64)>,
    ApiJson(request): ApiJson<CloseRoundRequest>,
) -> Result<impl IntoResponse, PokerError> {
    let subject_id = parse_subject_id(raw_subject)?;
    let credentials = Credentials::new(request.organizer_name, request.password);
    state
        .service
        .close_round(&RoomHash::from(room_hash), subject_id, &credentials)
        .await?;
    Ok(Json(json!({
        "message": format!("Round {} has been closed", subject_id),
    })))
}

async fn get_round_handler(
    State(state): State<AppState>,
    ApiPath((room_hash, raw_subject)): ApiPath<(String, i64)>,
) -> Result<impl IntoResponse, PokerError> {
    let subject_id = parse_subject_id(raw_subject)?;
    let round = state
        .service
        .get_round(&RoomHash::from(room_hash), subject_id)
        .await?;
    Ok(Json(json!({
        "round": round,
        "latestMoves": latest_moves(&round),
    })))
}

async fn report_handler(
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
) -> Result<impl IntoResponse, PokerError> {
    let report = state.service.report(&RoomHash::from(room_hash)).await?;
    Ok(Json(report))
}

async fn current_round_handler(
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
) -> Result<impl IntoResponse, PokerError> {
    let current = state
        .service
        .current_round(&RoomHash::from(room_hash))
        .await?;
    Ok(Json(json!({ "current": current })))
}

async fn roster_handler(
    State(state): State<AppState>,
    ApiPath(room_hash): ApiPath<String>,
) -> Result<impl IntoResponse, PokerError> {
    let roster = state.service.roster(&RoomHash::from(room_hash)).await?;
    Ok(Json(roster))
}
