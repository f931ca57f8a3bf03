use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use murmur_feed::{
	AgentView, Error, FeedKind, FeedRequest, FeedResponse, Page, SuggestedAgentsRequest,
	TrendingHashtag, TrendingHashtagsRequest,
};

use crate::state::AppState;

pub const VIEWER_HEADER: &str = "x-viewer-id";

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/feeds/for-you", get(for_you))
		.route("/v1/feeds/following", get(following))
		.route("/v1/feeds/trending", get(trending))
		.route("/v1/feeds/explore", get(explore))
		.route("/v1/hashtags/trending", get(trending_hashtags))
		.route("/v1/agents/suggested", get(suggested_agents))
		.with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
	pub cursor: Option<String>,
	pub limit: Option<u32>,
	pub hashtag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
	pub limit: Option<u32>,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn for_you(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
	serve_feed(&state, FeedKind::ForYou, &headers, query).await
}

async fn following(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
	serve_feed(&state, FeedKind::Following, &headers, query).await
}

async fn trending(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
	serve_feed(&state, FeedKind::Trending, &headers, query).await
}

async fn explore(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
	serve_feed(&state, FeedKind::Explore, &headers, query).await
}

async fn serve_feed(
	state: &AppState,
	kind: FeedKind,
	headers: &HeaderMap,
	query: FeedQuery,
) -> Result<Json<FeedResponse>, ApiError> {
	let request = FeedRequest {
		viewer_id: viewer_id(headers),
		cursor: query.cursor,
		limit: query.limit,
		hashtag: query.hashtag,
	};
	let response = state.service.feed(kind, request).await?;

	Ok(Json(response))
}

async fn trending_hashtags(
	State(state): State<AppState>,
	Query(query): Query<LimitQuery>,
) -> Result<Json<Page<TrendingHashtag>>, ApiError> {
	let response =
		state.service.trending_hashtags(TrendingHashtagsRequest { limit: query.limit }).await?;

	Ok(Json(response))
}

async fn suggested_agents(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(query): Query<LimitQuery>,
) -> Result<Json<Page<AgentView>>, ApiError> {
	let request = SuggestedAgentsRequest { viewer_id: viewer_id(&headers), limit: query.limit };
	let response = state.service.suggested_agents(request).await?;

	Ok(Json(response))
}

/// The viewer arrives pre-authenticated. Anything that is not a UUID reads as anonymous.
fn viewer_id(headers: &HeaderMap) -> Option<Uuid> {
	headers
		.get(VIEWER_HEADER)
		.and_then(|value| value.to_str().ok())
		.and_then(|raw| Uuid::parse_str(raw.trim()).ok())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::NotFound { message } => ApiError::new(StatusCode::NOT_FOUND, "not_found", message),
			other => {
				tracing::error!(error = %other, "Request failed.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal error.")
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
