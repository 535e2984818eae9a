//! E-mail routes: campaign creation and the send stub
//!
//! No mail transport is contacted. Each recipient gets an `email_sent`
//! activity on its timeline and the request is reported as queued.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};

use super::crm_routes::create;
use super::errors::ApiResult;
use super::extract::ValidatedJson;
use super::response::CreatedResponse;
use super::state::AppState;
use crate::observability::{Event, Logger};
use crate::schema::{
    Activity, ActivityType, EmailCampaign, EntityKind, EntityType, SendEmailRequest,
};

/// Provider reported when the caller names none
pub const MOCK_PROVIDER: &str = "mock";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendEmailResponse {
    pub status: String,
    pub provider: String,
    pub sent: usize,
}

/// Create e-mail routes
pub fn email_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/email/campaigns", post(create_campaign_handler))
        .route("/email/send", post(send_email_handler))
        .with_state(state)
}

/// The timeline entry recorded for one recipient
pub fn email_sent_activity(address: &str, subject: &str, provider: &str) -> Activity {
    let mut meta = Map::new();
    meta.insert("provider".to_string(), Value::String(provider.to_string()));

    Activity {
        entity_type: EntityKind::Contact,
        entity_id: address.to_string(),
        activity_type: ActivityType::EmailSent,
        message: format!("Email sent: {}", subject),
        meta,
    }
}

async fn create_campaign_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(campaign): ValidatedJson<EmailCampaign>,
) -> ApiResult<Json<CreatedResponse>> {
    create(&state, EntityType::EmailCampaign, &campaign)
}

async fn send_email_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> ApiResult<Json<SendEmailResponse>> {
    let provider = request
        .provider
        .clone()
        .unwrap_or_else(|| MOCK_PROVIDER.to_string());

    for address in &request.to {
        let activity = email_sent_activity(address, &request.subject, &provider);
        state.gateway.create(EntityType::Activity, &activity)?;
    }

    let sent = request.to.len();
    Logger::info(
        Event::EmailQueued.as_str(),
        &[("provider", provider.as_str()), ("recipients", sent.to_string().as_str())],
    );

    Ok(Json(SendEmailResponse {
        status: "queued".to_string(),
        provider,
        sent,
    }))
}
