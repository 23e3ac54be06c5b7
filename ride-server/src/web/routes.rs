//! HTTP route handlers.

use axum::extract::ws::WebSocketUpgrade;
use axum::{
    Json, Router, async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::chat;
use crate::discovery::DiscoveryError;
use crate::domain::{
    ConnectionId, DomainError, GenderPreference, Journey, Segment, Stop, Trip, TripId, TripStatus,
    WallClock,
};
use crate::lifecycle::LifecycleError;

use super::auth::CurrentUser;
use super::dto::*;
use super::state::AppState;

/// Header carrying the shared secret for the cron trigger.
const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trips", post(create_trip).get(list_trips))
        .route("/trips/mine", get(my_trips))
        .route("/trips/discover/:trip_id", get(discover))
        .route("/trips/update-statuses", patch(run_sweep))
        .route("/trips/:id", put(update_trip).delete(delete_trip))
        .route("/connections", post(create_connection))
        .route("/connections/notifications", get(notifications))
        .route("/connections/mine", get(my_connections))
        .route("/connections/accepted", get(accepted_connections))
        .route("/connections/:id", put(respond_connection))
        .route("/messages/:connection_id", get(message_history))
        .route("/chat/ws", get(chat_ws))
        .route("/internal/cron/complete-trips", post(cron_sweep))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// JSON request body, parsed manually so that malformed input yields the
/// API's own 400 `{"error": ...}` response rather than the framework's
/// plain-text rejection.
struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: format!("Invalid JSON: {e}"),
            })?;
        let value = serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        })?;
        Ok(ApiJson(value))
    }
}

/// Create a new trip.
async fn create_trip(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<TripRequest>,
) -> Result<Response, ApiError> {
    let (journey, preference) = parse_trip_request(&req)?;
    // Only an explicit "active" takes effect; everything else starts pending.
    let status = match req.status {
        Some(TripStatus::Active) => TripStatus::Active,
        _ => TripStatus::Pending,
    };

    let trip = Trip::new(user.id(), journey, preference, status, Utc::now());
    state.trips.insert(trip.clone()).await;

    let view = TripView::from_parts(&trip, &user.0);
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

/// List every trip with its owner populated.
async fn list_trips(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<TripView>>, ApiError> {
    let mut views = Vec::new();
    for trip in state.trips.all().await {
        // Trips whose owner record is gone are not shown.
        let Some(owner) = state.users.get(trip.owner).await else {
            continue;
        };
        views.push(TripView::from_parts(&trip, &owner));
    }
    Ok(Json(views))
}

/// List the caller's own trips.
async fn my_trips(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<TripView>>, ApiError> {
    let views = state
        .trips
        .by_owner(user.id())
        .await
        .iter()
        .map(|trip| TripView::from_parts(trip, &user.0))
        .collect();
    Ok(Json(views))
}

/// Replace a trip's journey and preference. Owner only.
async fn update_trip(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TripId>,
    ApiJson(req): ApiJson<TripRequest>,
) -> Result<Json<TripView>, ApiError> {
    let trip = state.trips.get(id).await.ok_or_else(trip_not_found)?;
    if trip.owner != user.id() {
        return Err(ApiError::Forbidden {
            message: "Not authorized".to_owned(),
        });
    }

    // The replacement journey is validated exactly like a new one.
    let (journey, preference) = parse_trip_request(&req)?;
    let updated = state
        .trips
        .update(id, |t| {
            t.journey = journey;
            t.gender_preference = preference;
            if let Some(status) = req.status {
                t.status = status;
            }
        })
        .await
        .ok_or_else(trip_not_found)?;

    Ok(Json(TripView::from_parts(&updated, &user.0)))
}

/// Delete a trip. Owner only.
async fn delete_trip(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TripId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let trip = state.trips.get(id).await.ok_or_else(trip_not_found)?;
    if trip.owner != user.id() {
        return Err(ApiError::Forbidden {
            message: "Not authorized".to_owned(),
        });
    }

    state.trips.remove(id).await;
    Ok(Json(json!({ "message": "Trip deleted" })))
}

/// Find co-travelers for a trip, grouped per leg.
async fn discover(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(trip_id): Path<TripId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let buckets = state.discovery().discover(user.id(), trip_id).await?;

    let mut results = serde_json::Map::new();
    for bucket in buckets {
        let trips: Vec<serde_json::Value> = bucket
            .trips
            .iter()
            .map(|m| {
                serde_json::to_value(TripView::from_parts(&m.trip, &m.owner))
                    .unwrap_or(serde_json::Value::Null)
            })
            .collect();
        results.insert(bucket.label, serde_json::Value::Array(trips));
    }
    Ok(Json(serde_json::Value::Object(results)))
}

/// Run the auto-completion sweep on demand.
async fn run_sweep(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<SweepReportView>, ApiError> {
    let report = state.sweeper().run(Utc::now()).await;
    Ok(Json(SweepReportView::from_report(&report)))
}

/// Run the sweep from an external scheduler, gated by a shared secret.
async fn cron_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SweepReportView>, ApiError> {
    let Some(expected) = state.config.cron_secret.as_deref() else {
        return Err(ApiError::Unauthorized {
            message: "Cron endpoint disabled".to_owned(),
        });
    };
    let presented = headers
        .get(CRON_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != expected {
        return Err(ApiError::Unauthorized {
            message: "Invalid cron secret".to_owned(),
        });
    }

    let report = state.sweeper().run(Utc::now()).await;
    Ok(Json(SweepReportView::from_report(&report)))
}

/// Send a connection request.
async fn create_connection(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(req): ApiJson<ConnectionRequest>,
) -> Result<Response, ApiError> {
    let (Some(trip_id), Some(matched_trip_id)) = (req.trip_id, req.matched_trip_id) else {
        return Err(ApiError::BadRequest {
            message: "Required fields missing".to_owned(),
        });
    };

    let connection = state
        .lifecycle()
        .request(user.id(), trip_id, matched_trip_id, Utc::now())
        .await?;
    let view = ConnectionView::from_connection(&connection);
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

/// Accept or reject a pending request. Recipient only.
async fn respond_connection(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ConnectionId>,
    ApiJson(req): ApiJson<RespondRequest>,
) -> Result<Json<ConnectionView>, ApiError> {
    let status = req.status.ok_or_else(|| ApiError::BadRequest {
        message: "Invalid status".to_owned(),
    })?;

    let connection = state.lifecycle().respond(user.id(), id, status).await?;
    Ok(Json(ConnectionView::from_connection(&connection)))
}

/// Pending requests addressed to the caller.
async fn notifications(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<NotificationView>>, ApiError> {
    let requests = state.lifecycle().notifications(user.id()).await;
    Ok(Json(requests.iter().map(NotificationView::from_request).collect()))
}

/// Every connection involving the caller.
async fn my_connections(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<ConnectionView>>, ApiError> {
    let connections = state.lifecycle().mine(user.id()).await;
    Ok(Json(connections.iter().map(ConnectionView::from_connection).collect()))
}

/// Accepted connections involving the caller, fully populated.
async fn accepted_connections(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<AcceptedView>>, ApiError> {
    let accepted = state.lifecycle().accepted(user.id()).await;
    Ok(Json(accepted.iter().map(AcceptedView::from_accepted).collect()))
}

/// Chat history for a connection. Participants only.
async fn message_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(connection_id): Path<ConnectionId>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let connection = state
        .connections
        .get(connection_id)
        .await
        .ok_or_else(|| ApiError::NotFound {
            message: "Connection not found".to_owned(),
        })?;
    if !connection.involves(user.id()) {
        return Err(ApiError::Forbidden {
            message: "Not authorized to view this chat".to_owned(),
        });
    }

    let messages = state.chat_gate().history(connection_id).await;
    Ok(Json(messages.iter().map(MessageView::from_stored).collect()))
}

/// Upgrade to a chat WebSocket.
async fn chat_ws(State(state): State<AppState>, user: CurrentUser, ws: WebSocketUpgrade) -> Response {
    chat::ws_handler(ws, state.chat_gate(), state.rooms.clone(), user.id())
}

/// Build a validated journey and preference from a trip request.
fn parse_trip_request(req: &TripRequest) -> Result<(Journey, GenderPreference), ApiError> {
    let (Some(from), Some(to), Some(date), Some(time)) =
        (req.from.as_deref(), req.to.as_deref(), req.date, req.time.as_deref())
    else {
        return Err(ApiError::BadRequest {
            message: "Required fields missing".to_owned(),
        });
    };

    let headline = Segment::new(
        Stop::parse(from).map_err(bad_request)?,
        Stop::parse(to).map_err(bad_request)?,
        WallClock::parse_hhmm(time, date).map_err(bad_request)?,
    );

    let journey = if req.has_connections {
        let mut legs = Vec::new();
        for leg in req.legs.as_deref().unwrap_or_default() {
            let (Some(from), Some(to), Some(date), Some(time)) =
                (leg.from.as_deref(), leg.to.as_deref(), leg.date, leg.time.as_deref())
            else {
                return Err(ApiError::BadRequest {
                    message: "Each leg must have from, to, date, and time.".to_owned(),
                });
            };
            legs.push(Segment::new(
                Stop::parse(from).map_err(bad_request)?,
                Stop::parse(to).map_err(bad_request)?,
                WallClock::parse_hhmm(time, date).map_err(bad_request)?,
            ));
        }
        Journey::connected(headline, legs)?
    } else {
        Journey::direct(headline)
    };

    Ok((journey, req.gender_preference.unwrap_or_default()))
}

fn bad_request(err: impl std::fmt::Display) -> ApiError {
    ApiError::BadRequest {
        message: err.to_string(),
    }
}

fn trip_not_found() -> ApiError {
    ApiError::NotFound {
        message: "Trip not found".to_owned(),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum ApiError {
    BadRequest { message: String },
    Unauthorized { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DiscoveryError> for ApiError {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::TripNotFound => trip_not_found(),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::TripNotFound => trip_not_found(),
            LifecycleError::ConnectionNotFound => ApiError::NotFound {
                message: "Connection not found".to_owned(),
            },
            LifecycleError::NotTripOwner => ApiError::Forbidden {
                message: "Not authorized".to_owned(),
            },
            LifecycleError::SelfConnection => ApiError::BadRequest {
                message: "You can't connect to your own trip".to_owned(),
            },
            LifecycleError::PreviouslyRejected => ApiError::Forbidden {
                message: "This request was previously rejected".to_owned(),
            },
            LifecycleError::DuplicateRequest => ApiError::Conflict {
                message: "Connection request already exists".to_owned(),
            },
            LifecycleError::NotRecipient => ApiError::Forbidden {
                message: "Not authorized to act on this request".to_owned(),
            },
            LifecycleError::InvalidTargetStatus => ApiError::BadRequest {
                message: "Invalid status".to_owned(),
            },
            LifecycleError::AlreadySettled => ApiError::Conflict {
                message: "Connection already settled".to_owned(),
            },
            LifecycleError::AlreadyAccepted => ApiError::Conflict {
                message: "Connection already accepted".to_owned(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            ApiError::Forbidden { message } => (StatusCode::FORBIDDEN, message),
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict { message } => (StatusCode::CONFLICT, message),
            ApiError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
