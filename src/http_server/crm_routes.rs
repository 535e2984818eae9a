//! CRM collection routes
//!
//! Create and list endpoints for contacts, companies, deals and activities.
//! There is no update or delete.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::errors::ApiResult;
use super::extract::{ValidatedJson, ValidatedQuery};
use super::response::{to_public_all, CreatedResponse};
use super::state::AppState;
use crate::schema::{Activity, Company, Contact, Deal, EntityType};
use crate::store::{Document, Filter};

// ==================
// Query Parameters
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    /// Contacts carrying this tag
    pub tag: Option<String>,
    pub company_id: Option<String>,
    /// Matches `funnel_stage`
    pub stage: Option<String>,
    /// Alias of `stage`, used when `stage` is absent or empty
    pub funnel_stage: Option<String>,
}

impl ContactQuery {
    pub fn to_filter(&self) -> Filter {
        let stage = self
            .stage
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.funnel_stage.as_deref());

        Filter::all()
            .and_eq_opt("tags", self.tag.as_deref())
            .and_eq_opt("company_id", self.company_id.as_deref())
            .and_eq_opt("funnel_stage", stage)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DealQuery {
    pub stage: Option<String>,
}

impl DealQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::all().and_eq_opt("stage", self.stage.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

impl ActivityQuery {
    pub fn to_filter(&self) -> Filter {
        Filter::all()
            .and_eq_opt("entity_type", self.entity_type.as_deref())
            .and_eq_opt("entity_id", self.entity_id.as_deref())
    }
}

// ==================
// CRM Routes
// ==================

/// Create CRM collection routes
pub fn crm_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/contacts",
            post(create_contact_handler).get(list_contacts_handler),
        )
        .route(
            "/companies",
            post(create_company_handler).get(list_companies_handler),
        )
        .route("/deals", post(create_deal_handler).get(list_deals_handler))
        .route(
            "/activities",
            post(create_activity_handler).get(list_activities_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

pub(super) fn create<T: Serialize>(
    state: &AppState,
    entity_type: EntityType,
    payload: &T,
) -> ApiResult<Json<CreatedResponse>> {
    let id = state.gateway.create(entity_type, payload)?;
    Ok(Json(CreatedResponse::new(id)))
}

fn list(state: &AppState, entity_type: EntityType, filter: &Filter) -> ApiResult<Json<Vec<Document>>> {
    let docs = state.gateway.list(entity_type, filter, None)?;
    Ok(Json(to_public_all(docs)))
}

// ==================
// Create Handlers
// ==================

async fn create_contact_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(contact): ValidatedJson<Contact>,
) -> ApiResult<Json<CreatedResponse>> {
    create(&state, EntityType::Contact, &contact)
}

async fn create_company_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(company): ValidatedJson<Company>,
) -> ApiResult<Json<CreatedResponse>> {
    create(&state, EntityType::Company, &company)
}

async fn create_deal_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(deal): ValidatedJson<Deal>,
) -> ApiResult<Json<CreatedResponse>> {
    create(&state, EntityType::Deal, &deal)
}

async fn create_activity_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(activity): ValidatedJson<Activity>,
) -> ApiResult<Json<CreatedResponse>> {
    create(&state, EntityType::Activity, &activity)
}

// ==================
// List Handlers
// ==================

async fn list_contacts_handler(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ContactQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    list(&state, EntityType::Contact, &query.to_filter())
}

async fn list_companies_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Document>>> {
    list(&state, EntityType::Company, &Filter::all())
}

async fn list_deals_handler(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<DealQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    list(&state, EntityType::Deal, &query.to_filter())
}

async fn list_activities_handler(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ActivityQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    list(&state, EntityType::Activity, &query.to_filter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FilterExpr;

    #[test]
    fn test_contact_query_filter() {
        let query = ContactQuery {
            tag: Some("vip".to_string()),
            company_id: None,
            stage: Some("Won".to_string()),
            funnel_stage: None,
        };

        let filter = query.to_filter();
        assert_eq!(
            filter.exprs,
            vec![
                FilterExpr::eq("tags", "vip"),
                FilterExpr::eq("funnel_stage", "Won"),
            ]
        );
    }

    #[test]
    fn test_funnel_stage_alias() {
        let alias_only = ContactQuery {
            funnel_stage: Some("Lost".to_string()),
            ..Default::default()
        };
        assert_eq!(alias_only.to_filter().exprs, vec![FilterExpr::eq("funnel_stage", "Lost")]);

        let both = ContactQuery {
            stage: Some("Won".to_string()),
            funnel_stage: Some("Lost".to_string()),
            ..Default::default()
        };
        assert_eq!(both.to_filter().exprs, vec![FilterExpr::eq("funnel_stage", "Won")]);

        let empty_stage = ContactQuery {
            stage: Some(String::new()),
            funnel_stage: Some("Lost".to_string()),
            ..Default::default()
        };
        assert_eq!(empty_stage.to_filter().exprs.len(), 1);
    }

    #[test]
    fn test_empty_query_is_unfiltered() {
        assert!(ContactQuery::default().to_filter().is_empty());
        assert!(DealQuery { stage: Some(String::new()) }.to_filter().is_empty());
        assert!(ActivityQuery::default().to_filter().is_empty());
    }
}
