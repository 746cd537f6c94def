//! Core library for draftboard.  This module wires the chat stores, the
//! visitor tracker and the analysis proxy into an axum router.  All state is
//! process-local: each running instance owns its own stores.

pub mod admin;
pub mod analysis;
pub mod chat;
mod config;
pub mod errors;
pub mod util;
pub mod visitors;

pub use config::{
    AppConfig, ChatFileConfig, ChatLimits, PartialChatLimits, MAX_ANALYSIS_TIMEOUT_MS,
    MAX_SEND_INTERVAL_MS, MAX_VISITOR_TIMEOUT_SECS,
};

use axum::extract::{
    rejection::{BytesRejection, FailedToBufferBody, JsonRejection},
    DefaultBodyLimit, Query, State,
};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

use crate::admin::{AddressAllowList, AdminPolicy, ClientAddress};
use crate::analysis::{AnalysisUpstream, UnconfiguredUpstream, WebhookUpstream};
use crate::chat::{unread_from_participant, ChatStore, Message, MessageFilter, NewMessage, SendGuard};
use crate::errors::{AppError, AppResult};
use crate::util::{Clock, SystemClock};
use crate::visitors::VisitorTracker;

/// Display name used for operator replies that do not name an author.
pub const DEFAULT_OPERATOR_NAME: &str = "Admin";

/// Longest accepted visitor session or participant id.
const MAX_CLIENT_ID_CHARS: usize = 128;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub is_from_operator: bool,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DirectSendRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSendRequest {
    #[serde(default)]
    pub body: String,
    pub author: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeartbeatAction {
    #[default]
    Heartbeat,
    Leave,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub action: HeartbeatAction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectQuery {
    user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub message: Message,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMessagesResponse {
    pub success: bool,
    pub messages: Vec<Message>,
    pub participant_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessagesResponse {
    pub success: bool,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorCountResponse {
    pub success: bool,
    pub visitor_count: usize,
}

/// Upstream failure codes exposed as metric labels.
const UPSTREAM_CODES: [&str; 7] = [
    "TIMEOUT",
    "CONNECTION_REFUSED",
    "CONNECTION_FAILED",
    "NETWORK_ERROR",
    "UPSTREAM_STATUS",
    "NOT_CONFIGURED",
    "UNKNOWN",
];

/// Process-wide counters for the `/metrics` exposition.
pub struct Metrics {
    pub public_messages_total: AtomicU64,
    pub direct_messages_total: AtomicU64,
    pub validation_rejections_total: AtomicU64,
    pub forbidden_total: AtomicU64,
    pub rate_limited_total: AtomicU64,
    pub heartbeats_total: AtomicU64,
    pub analysis_requests_total: AtomicU64,
    /// Index aligned with `UPSTREAM_CODES`.
    analysis_errors: Vec<AtomicU64>,
}

impl Metrics {
    fn new() -> Self {
        Self {
            public_messages_total: AtomicU64::new(0),
            direct_messages_total: AtomicU64::new(0),
            validation_rejections_total: AtomicU64::new(0),
            forbidden_total: AtomicU64::new(0),
            rate_limited_total: AtomicU64::new(0),
            heartbeats_total: AtomicU64::new(0),
            analysis_requests_total: AtomicU64::new(0),
            analysis_errors: UPSTREAM_CODES.iter().map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Count a rejected request and hand the error back.
    fn rejected(&self, err: AppError) -> AppError {
        match &err {
            AppError::Validation(_) | AppError::PayloadTooLarge(_) => {
                self.validation_rejections_total
                    .fetch_add(1, Ordering::Relaxed);
            }
            AppError::Authorization(_) => {
                self.forbidden_total.fetch_add(1, Ordering::Relaxed);
            }
            AppError::RateLimited { .. } => {
                self.rate_limited_total.fetch_add(1, Ordering::Relaxed);
            }
            AppError::Upstream(inner) => {
                if let Some(idx) = UPSTREAM_CODES.iter().position(|c| *c == inner.code()) {
                    self.analysis_errors[idx].fetch_add(1, Ordering::Relaxed);
                }
            }
            AppError::MethodNotAllowed => {}
        }
        err
    }

    pub fn analysis_errors(&self, code: &str) -> u64 {
        UPSTREAM_CODES
            .iter()
            .position(|c| *c == code)
            .map(|idx| self.analysis_errors[idx].load(Ordering::Relaxed))
            .unwrap_or(0)
    }
}

/// Application state shared across handlers.  Cloning is cheap; every store
/// sits behind an `Arc` and is shared by all clones.
#[derive(Clone)]
pub struct AppState {
    pub public_chat: Arc<ChatStore>,
    pub direct_chat: Arc<ChatStore>,
    pub visitors: Arc<VisitorTracker>,
    pub admin_policy: Arc<dyn AdminPolicy>,
    pub analysis: Arc<dyn AnalysisUpstream>,
    /// Maximum accepted raw request body size in bytes (None => axum default)
    pub max_request_bytes: Option<usize>,
    pub metrics: Arc<Metrics>,
    // Process start time (epoch secs) and instant for uptime computation
    pub process_start_epoch: f64,
    pub process_start_instant: Instant,
}

/// Build state from an explicit configuration and clock.  Tests pass a
/// `ManualClock` here to step through the send interval and visitor timeout.
pub fn build_state(config: AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<AppState> {
    let AppConfig {
        blocked_words,
        admin_addresses,
        public_chat,
        direct_chat,
        send_interval_ms,
        visitor_timeout_secs,
        max_request_bytes,
        analysis_webhook_url,
        analysis_timeout_ms,
    } = config;

    let filter = Arc::new(MessageFilter::new(blocked_words.as_slice()));
    let interval = i64::try_from(send_interval_ms)
        .ok()
        .and_then(chrono::Duration::try_milliseconds)
        .ok_or_else(|| anyhow::anyhow!("send interval {} ms is out of range", send_interval_ms))?;
    let visitor_timeout = i64::try_from(visitor_timeout_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| {
            anyhow::anyhow!("visitor timeout {} s is out of range", visitor_timeout_secs)
        })?;

    let public_store = ChatStore::new(
        "public",
        public_chat,
        filter.clone(),
        SendGuard::new(interval),
        clock.clone(),
    );
    let direct_store = ChatStore::new(
        "direct",
        direct_chat,
        filter.clone(),
        SendGuard::new(interval),
        clock.clone(),
    );
    let visitors = VisitorTracker::new(visitor_timeout, clock);

    let admin_policy = AddressAllowList::new(&admin_addresses);
    if admin_policy.is_empty() {
        tracing::warn!("No admin addresses configured; operator actions are disabled");
    }

    let analysis: Arc<dyn AnalysisUpstream> = match analysis_webhook_url {
        Some(url) => {
            tracing::info!(url = %url, timeout_ms = analysis_timeout_ms, "analysis webhook configured");
            Arc::new(WebhookUpstream::new(url, analysis_timeout_ms)?)
        }
        None => {
            tracing::warn!("Analysis proxy disabled: ANALYSIS_WEBHOOK_URL not set");
            Arc::new(UnconfiguredUpstream)
        }
    };

    tracing::info!(
        blocked_words = filter.len(),
        admin_addresses = admin_policy.len(),
        public_cap = public_chat.cap,
        direct_cap = direct_chat.cap,
        send_interval_ms,
        visitor_timeout_secs,
        "state initialised"
    );

    let start_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();

    Ok(AppState {
        public_chat: Arc::new(public_store),
        direct_chat: Arc::new(direct_store),
        visitors: Arc::new(visitors),
        admin_policy: Arc::new(admin_policy),
        analysis,
        max_request_bytes,
        metrics: Arc::new(Metrics::new()),
        process_start_epoch: start_time.as_secs_f64(),
        process_start_instant: Instant::now(),
    })
}

/// Build state from environment variables (see `AppConfig::from_env`) with
/// the system clock.
pub async fn build_state_from_env() -> Result<AppState, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env().map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;
    let state = build_state(config, Arc::new(SystemClock))
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;
    Ok(state)
}

/// Wrap a method router so every route answers `OPTIONS` with an empty 200
/// and any other unsupported method with a JSON 405.
fn endpoint(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.options(preflight_handler).fallback(method_not_allowed)
}

/// Build the Axum router and attach handlers.  The router holds a copy
/// of the `AppState` for each invocation.
pub fn app(state: AppState) -> Router {
    let max_request_bytes = state.max_request_bytes;

    let router = Router::new()
        .route("/chat/send", endpoint(post(send_public_handler)))
        .route("/chat/messages", endpoint(get(list_public_handler)))
        .route("/chat/direct/send", endpoint(post(send_direct_handler)))
        .route("/chat/direct/messages", endpoint(get(list_direct_handler)))
        .route("/visitors/heartbeat", endpoint(post(heartbeat_handler)))
        .route("/visitors/count", endpoint(get(visitor_count_handler)))
        .route("/analysis/request", endpoint(post(analysis_handler)))
        .route("/admin/check", endpoint(get(admin_check_handler)))
        .route("/admin/chat/send", endpoint(post(admin_send_handler)))
        .route("/admin/chat/messages", endpoint(get(admin_messages_handler)))
        .route("/admin/chat/read", endpoint(post(admin_mark_read_handler)))
        .route("/healthz", endpoint(get(healthz_handler)))
        .route("/metrics", endpoint(get(metrics_handler)));

    let router = if let Some(limit) = max_request_bytes {
        router.layer(DefaultBodyLimit::max(limit))
    } else {
        router
    };

    router.layer(CorsLayer::permissive()).with_state(state)
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn json_body<T>(
    state: &AppState,
    payload: Result<Json<T>, JsonRejection>,
) -> AppResult<T> {
    match payload {
        Ok(Json(inner)) => Ok(inner),
        Err(JsonRejection::BytesRejection(BytesRejection::FailedToBufferBody(
            FailedToBufferBody::LengthLimitError(_),
        ))) => {
            let message = match state.max_request_bytes {
                Some(limit) => format!("Request too large (body exceeded limit {} bytes)", limit),
                None => "Request too large".to_string(),
            };
            tracing::warn!(limit = ?state.max_request_bytes, "request body exceeded configured limit");
            Err(AppError::PayloadTooLarge(message))
        }
        Err(rejection) => Err(AppError::validation(rejection.body_text())),
    }
}

fn require_operator(state: &AppState, client: &ClientAddress) -> AppResult<()> {
    if state.admin_policy.is_privileged(client.as_deref()) {
        Ok(())
    } else {
        tracing::warn!(client = ?client.as_deref(), "operator action refused");
        Err(AppError::forbidden())
    }
}

fn client_id(raw: &str, field: &str) -> AppResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    if util::char_len(id) > MAX_CLIENT_ID_CHARS {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, MAX_CLIENT_ID_CHARS
        )));
    }
    Ok(id.to_owned())
}

/// Handler for `POST /chat/send`.  Claiming `isFromOperator` requires an
/// allow-listed address.
async fn send_public_handler(
    State(state): State<AppState>,
    client: ClientAddress,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> AppResult<Json<SendResponse>> {
    let result = (|| -> AppResult<Message> {
        let req = json_body(&state, payload)?;
        if req.is_from_operator {
            require_operator(&state, &client)?;
        }
        let msg = NewMessage {
            author: req.author,
            body: req.body,
            is_from_operator: req.is_from_operator,
            owner_id: None,
        };
        state.public_chat.append(msg)
    })();
    let message = result.map_err(|e| state.metrics.rejected(e))?;
    state
        .metrics
        .public_messages_total
        .fetch_add(1, Ordering::Relaxed);
    tracing::info!(id = %message.id, operator = message.is_from_operator, "public message stored");
    Ok(Json(SendResponse {
        success: true,
        message,
    }))
}

async fn list_public_handler(State(state): State<AppState>) -> Json<PublicMessagesResponse> {
    Json(PublicMessagesResponse {
        success: true,
        messages: state.public_chat.list_all(),
        participant_count: state.public_chat.participant_count(),
    })
}

/// Handler for `POST /chat/direct/send`: a participant writing to the
/// operator.
async fn send_direct_handler(
    State(state): State<AppState>,
    payload: Result<Json<DirectSendRequest>, JsonRejection>,
) -> AppResult<Json<SendResponse>> {
    let result = (|| -> AppResult<Message> {
        let req = json_body(&state, payload)?;
        let owner = client_id(&req.user_id, "userId")?;
        state
            .direct_chat
            .append(NewMessage::participant(req.author, req.body).owned_by(owner))
    })();
    let message = result.map_err(|e| state.metrics.rejected(e))?;
    state
        .metrics
        .direct_messages_total
        .fetch_add(1, Ordering::Relaxed);
    tracing::info!(id = %message.id, owner = ?message.owner_id, "direct message stored");
    Ok(Json(SendResponse {
        success: true,
        message,
    }))
}

async fn list_direct_handler(
    State(state): State<AppState>,
    Query(query): Query<DirectQuery>,
) -> AppResult<Json<DirectMessagesResponse>> {
    let user_id = client_id(query.user_id.as_deref().unwrap_or(""), "userId")
        .map_err(|e| state.metrics.rejected(e))?;
    Ok(Json(DirectMessagesResponse {
        success: true,
        messages: state.direct_chat.list_for(&user_id),
        unread_count: None,
    }))
}

async fn heartbeat_handler(
    State(state): State<AppState>,
    payload: Result<Json<HeartbeatRequest>, JsonRejection>,
) -> AppResult<Json<VisitorCountResponse>> {
    let (session_id, action) = json_body(&state, payload)
        .and_then(|req| Ok((client_id(&req.session_id, "sessionId")?, req.action)))
        .map_err(|e| state.metrics.rejected(e))?;
    let visitor_count = match action {
        HeartbeatAction::Heartbeat => {
            state.metrics.heartbeats_total.fetch_add(1, Ordering::Relaxed);
            state.visitors.heartbeat(&session_id)
        }
        HeartbeatAction::Leave => {
            tracing::debug!(session = %session_id, "visitor left");
            state.visitors.leave(&session_id)
        }
    };
    Ok(Json(VisitorCountResponse {
        success: true,
        visitor_count,
    }))
}

async fn visitor_count_handler(State(state): State<AppState>) -> Json<VisitorCountResponse> {
    Json(VisitorCountResponse {
        success: true,
        visitor_count: state.visitors.count(),
    })
}

/// Handler for `POST /analysis/request`.  Forwards the payload and returns
/// the upstream answer verbatim.
async fn analysis_handler(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<Response> {
    let payload = json_body(&state, payload).map_err(|e| state.metrics.rejected(e))?;
    state
        .metrics
        .analysis_requests_total
        .fetch_add(1, Ordering::Relaxed);
    let start = Instant::now();
    let reply = match state.analysis.forward(payload).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!(code = err.code(), error = %err, latency_ms = start.elapsed().as_millis() as u64, "analysis request failed");
            return Err(state.metrics.rejected(AppError::Upstream(err)));
        }
    };
    tracing::info!(
        status = reply.status,
        latency_ms = start.elapsed().as_millis() as u64,
        "analysis request completed"
    );
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    let content_type = reply
        .content_type
        .unwrap_or_else(|| "text/plain; charset=utf-8".to_string());
    Ok((status, [(header::CONTENT_TYPE, content_type)], reply.body).into_response())
}

async fn admin_check_handler(
    State(state): State<AppState>,
    client: ClientAddress,
) -> Json<serde_json::Value> {
    let is_admin = state.admin_policy.is_privileged(client.as_deref());
    Json(serde_json::json!({ "success": true, "isAdmin": is_admin }))
}

/// Handler for `POST /admin/chat/send`: an operator reply into the direct
/// inbox.
async fn admin_send_handler(
    State(state): State<AppState>,
    client: ClientAddress,
    payload: Result<Json<OperatorSendRequest>, JsonRejection>,
) -> AppResult<Json<SendResponse>> {
    let result = (|| -> AppResult<Message> {
        require_operator(&state, &client)?;
        let req = json_body(&state, payload)?;
        let author = req
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OPERATOR_NAME.to_string());
        let mut msg = NewMessage::operator(author, req.body);
        if let Some(user_id) = req.user_id.as_deref().filter(|u| !u.trim().is_empty()) {
            msg = msg.owned_by(client_id(user_id, "userId")?);
        }
        state.direct_chat.append(msg)
    })();
    let message = result.map_err(|e| state.metrics.rejected(e))?;
    state
        .metrics
        .direct_messages_total
        .fetch_add(1, Ordering::Relaxed);
    tracing::info!(id = %message.id, owner = ?message.owner_id, "operator reply stored");
    Ok(Json(SendResponse {
        success: true,
        message,
    }))
}

async fn admin_messages_handler(
    State(state): State<AppState>,
    client: ClientAddress,
) -> AppResult<Json<DirectMessagesResponse>> {
    require_operator(&state, &client).map_err(|e| state.metrics.rejected(e))?;
    Ok(Json(DirectMessagesResponse {
        success: true,
        messages: state.direct_chat.list_all(),
        unread_count: Some(state.direct_chat.unread_count()),
    }))
}

async fn admin_mark_read_handler(
    State(state): State<AppState>,
    client: ClientAddress,
) -> AppResult<Json<serde_json::Value>> {
    require_operator(&state, &client).map_err(|e| state.metrics.rejected(e))?;
    let marked = state.direct_chat.mark_all_read(unread_from_participant);
    tracing::info!(marked, "direct messages marked read");
    Ok(Json(serde_json::json!({ "success": true, "marked": marked })))
}

/// Simple health endpoint for container readiness / liveness checks.
async fn healthz_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "publicMessages": state.public_chat.len(),
        "directMessages": state.direct_chat.len(),
        "visitorCount": state.visitors.count(),
    }))
}

/// Prometheus-style metrics exposition. Text format with simple counters.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    use std::fmt::Write as _;
    let mut buf = String::new();
    let m = &state.metrics;
    let counters: [(&str, &str, u64); 7] = [
        (
            "draftboard_public_messages_total",
            "Public chat messages accepted",
            m.public_messages_total.load(Ordering::Relaxed),
        ),
        (
            "draftboard_direct_messages_total",
            "Direct chat messages accepted (participant and operator)",
            m.direct_messages_total.load(Ordering::Relaxed),
        ),
        (
            "draftboard_validation_rejections_total",
            "Requests rejected for missing, oversized or malformed input",
            m.validation_rejections_total.load(Ordering::Relaxed),
        ),
        (
            "draftboard_forbidden_total",
            "Operator actions refused for non-allow-listed callers",
            m.forbidden_total.load(Ordering::Relaxed),
        ),
        (
            "draftboard_rate_limited_total",
            "Chat sends rejected by the send interval",
            m.rate_limited_total.load(Ordering::Relaxed),
        ),
        (
            "draftboard_heartbeats_total",
            "Visitor heartbeats received",
            m.heartbeats_total.load(Ordering::Relaxed),
        ),
        (
            "draftboard_analysis_requests_total",
            "Analysis requests forwarded upstream",
            m.analysis_requests_total.load(Ordering::Relaxed),
        ),
    ];
    for (name, help, value) in counters {
        writeln!(&mut buf, "# HELP {} {}", name, help).ok();
        writeln!(&mut buf, "# TYPE {} counter", name).ok();
        writeln!(&mut buf, "{} {}", name, value).ok();
    }
    writeln!(
        &mut buf,
        "# HELP draftboard_analysis_errors_total Analysis failures by classification\n# TYPE draftboard_analysis_errors_total counter"
    )
    .ok();
    for (idx, code) in UPSTREAM_CODES.iter().enumerate() {
        writeln!(
            &mut buf,
            "draftboard_analysis_errors_total{{code=\"{}\"}} {}",
            code,
            m.analysis_errors[idx].load(Ordering::Relaxed)
        )
        .ok();
    }
    writeln!(
        &mut buf,
        "# HELP draftboard_active_visitors Visitor sessions live after the expiry sweep\n# TYPE draftboard_active_visitors gauge"
    )
    .ok();
    writeln!(&mut buf, "draftboard_active_visitors {}", state.visitors.count()).ok();
    writeln!(
        &mut buf,
        "# HELP draftboard_chat_messages_retained Messages currently held per store\n# TYPE draftboard_chat_messages_retained gauge"
    )
    .ok();
    for store in [&state.public_chat, &state.direct_chat] {
        writeln!(
            &mut buf,
            "draftboard_chat_messages_retained{{store=\"{}\"}} {}",
            store.name(),
            store.len()
        )
        .ok();
    }
    // Build info gauge (value 1)
    writeln!(
        &mut buf,
        "# HELP draftboard_build_info Build information\n# TYPE draftboard_build_info gauge"
    )
    .ok();
    writeln!(
        &mut buf,
        "draftboard_build_info{{version=\"{}\"}} 1",
        env!("CARGO_PKG_VERSION")
    )
    .ok();
    writeln!(
        &mut buf,
        "# HELP draftboard_process_start_time_seconds Process start time (Unix epoch seconds)\n# TYPE draftboard_process_start_time_seconds gauge"
    )
    .ok();
    writeln!(
        &mut buf,
        "draftboard_process_start_time_seconds {}",
        state.process_start_epoch
    )
    .ok();
    writeln!(
        &mut buf,
        "# HELP draftboard_process_uptime_seconds Process uptime seconds\n# TYPE draftboard_process_uptime_seconds gauge"
    )
    .ok();
    writeln!(
        &mut buf,
        "draftboard_process_uptime_seconds {}",
        state.process_start_instant.elapsed().as_secs_f64()
    )
    .ok();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        buf,
    )
        .into_response()
}
