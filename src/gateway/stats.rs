//! Summary statistics, computed from the store on every call

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::{StorageGateway, CREATED_AT_FIELD};
use crate::schema::{DealStage, EntityType};
use crate::store::{Filter, FilterExpr, StoreResult};

/// Width of the "recently created" window
pub const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_contacts: u64,
    /// Deals neither won nor lost
    pub active_deals: u64,
    /// Sum of `value` over active deals
    pub pipeline_value: f64,
    pub won_deals: u64,
    /// Contacts whose `created_at` falls within the last 30 days
    pub created_last_30_days: u64,
}

/// Deals whose stage is not closed
fn open_deals() -> Filter {
    let closed = DealStage::ALL
        .iter()
        .filter(|stage| stage.is_closed())
        .map(|stage| json!(stage.as_str()))
        .collect();
    Filter::all().and(FilterExpr::not_in("stage", closed))
}

/// Compute the dashboard summary as of `now`.
pub fn summarize(gateway: &StorageGateway, now: DateTime<Utc>) -> StoreResult<SummaryStats> {
    let total_contacts = gateway.count(EntityType::Contact, &Filter::all())?;
    let active_deals = gateway.count(EntityType::Deal, &open_deals())?;

    let pipeline_value = gateway
        .list(EntityType::Deal, &open_deals(), None)?
        .iter()
        .map(|deal| deal.get("value").and_then(Value::as_f64).unwrap_or(0.0))
        .sum::<f64>();

    let won_deals = gateway.count(
        EntityType::Deal,
        &Filter::all().and(FilterExpr::eq("stage", DealStage::Won.as_str())),
    )?;

    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let created_last_30_days = gateway
        .list(EntityType::Contact, &Filter::all(), None)?
        .iter()
        .filter_map(|contact| contact.get(CREATED_AT_FIELD).and_then(Value::as_str))
        .filter_map(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .filter(|created| created.with_timezone(&Utc) >= cutoff)
        .count() as u64;

    Ok(SummaryStats {
        total_contacts,
        active_deals,
        pipeline_value,
        won_deals,
        created_last_30_days,
    })
}
