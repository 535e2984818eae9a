//! Request extractors that route rejections through the schema layer

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::errors::ApiError;
use crate::schema::{bind, Entity, SchemaError};

/// JSON body bound to entity `T` through its schema.
///
/// Rejections never reach the store.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Entity + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| SchemaError::malformed_body(rejection.body_text()))?;

        Ok(ValidatedJson(bind::<T>(payload)?))
    }
}

/// Query string deserialized into `T`.
///
/// A parameter given more than once takes its last value. Rejections
/// answer 422 like body violations.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| SchemaError::malformed_query(rejection.body_text()))?;

        let params = last_value_wins(pairs);
        let query = serde_json::from_value(Value::Object(params))
            .map_err(|e| SchemaError::malformed_query(e.to_string()))?;

        Ok(ValidatedQuery(query))
    }
}

fn last_value_wins(pairs: Vec<(String, String)>) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in pairs {
        params.insert(key, Value::String(value));
    }
    params
}
