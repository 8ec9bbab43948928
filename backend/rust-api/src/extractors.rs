use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// JSON body extractor whose rejection is a JSON `{"error": ...}`
/// payload, the same error shape the quiz and practice handlers return.
/// The stock `Json` rejection would answer with plain text.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!("Rejected malformed request body: {}", rejection);
            let body = json!({ "error": format!("Invalid request body: {}", rejection) });
            (StatusCode::BAD_REQUEST, Json(body)).into_response()
        })?;
        Ok(AppJson(value))
    }
}
