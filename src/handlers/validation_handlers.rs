use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::registration::{self, AccountLookup, ValidationDecision, ValidationRequest, ValidationSettings};
use crate::throttle::RateLimiter;

#[derive(Serialize)]
pub struct ValidationResponse {
    pub validation_decisions: ValidationDecision,
}

/// POST /api/user/v1/validation/registration
///
/// Accepts a form-encoded or JSON object body and returns one decision per
/// recognised field. No authentication; throttled per client IP.
pub async fn validate_registration<S>(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<S>,
    settings: web::Data<ValidationSettings>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError>
where
    S: AccountLookup + 'static,
{
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));
    if !limiter.check(ip) {
        log::warn!("Registration validation throttled for {ip}");
        return Err(AppError::RateLimited);
    }

    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let request = parse_body(content_type, &body)?;

    let decisions = registration::validate(&request, store.get_ref(), *settings.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ValidationResponse { validation_decisions: decisions }))
}

/// Decode the submitted fields. JSON bodies must be a flat object; null
/// values count as absent and other scalars are taken as their JSON text.
pub fn parse_body(content_type: &str, body: &[u8]) -> Result<ValidationRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ValidationRequest::new());
    }

    if content_type.starts_with("application/json") {
        let object: Map<String, Value> = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
        let pairs = object.into_iter().filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        });
        Ok(ValidationRequest::from_pairs(pairs))
    } else {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid form body: {e}")))?;
        Ok(ValidationRequest::from_pairs(pairs))
    }
}

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Register the validation routes for a given account store type.
pub fn configure<S>(cfg: &mut web::ServiceConfig)
where
    S: AccountLookup + 'static,
{
    cfg.route("/health", web::get().to(health)).route(
        "/api/user/v1/validation/registration",
        web::post().to(validate_registration::<S>),
    );
}
