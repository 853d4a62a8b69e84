use crate::error::ErrorBody;
use crate::state::{GatewayState, RouteTarget};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Paths that bypass gateway authentication. `/api/users/profile` stays
/// public here because it is the token-validation callback; the
/// user-service enforces the bearer token itself.
const PUBLIC_PATHS: &[&str] = &[
    "/api/auth/register",
    "/api/auth/login",
    "/api/auth/refresh",
    "/api/auth/validate",
    "/api/users/profile",
];

/// Single front door: prefix routing, authentication, identity header
/// injection and circuit breaking around the upstream call.
pub async fn proxy(State(state): State<Arc<GatewayState>>, req: Request) -> Response {
    let path = req.uri().path().to_string();

    let Some(route) = match_route(&state.routes, &path) else {
        return error_response(StatusCode::NOT_FOUND, "No route for path", &path);
    };

    info!("Routing {} {} to {}", req.method(), path, route.name);

    // Authentication: resolve the caller before anything is forwarded.
    let mut identity = None;
    if route.requires_auth && !is_public(&path) {
        let token = match bearer_token(req.headers()) {
            Some(token) => token,
            None => {
                warn!("Missing Authorization header for path: {}", path);
                return error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header", &path);
            }
        };

        match state.validator.validate(&token).await {
            Ok(user) => {
                debug!("Token validated for user: {}", user.username);
                identity = Some(user);
            }
            Err(e) => {
                let (_, message) = e.status_and_message();
                warn!("Authentication failed for path {}: {}", path, message);
                return error_response(StatusCode::UNAUTHORIZED, message, &path);
            }
        }
    }

    // The body is buffered before the breaker is consulted: a failed read
    // must not consume a half-open trial.
    let (parts, body) = req.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Unreadable request body", &path),
    };

    let breaker = &state.breakers[route.name];
    if !breaker.try_acquire() {
        debug!("Circuit open for {}; short-circuiting", route.name);
        return fallback_response(route.fallback_message);
    }

    let mut upstream_path = strip_first_segment(&path);
    if let Some(query) = parts.uri.query() {
        upstream_path.push('?');
        upstream_path.push_str(query);
    }
    let url = format!("{}{}", route.base_url, upstream_path);

    let mut headers = forwardable_headers(&parts.headers);
    if let Some(user) = &identity {
        headers.insert("X-User-ID", user.id.to_string().parse().unwrap());
        if let Ok(name) = user.username.parse() {
            headers.insert("X-User-Name", name);
        }
        if let Ok(roles) = user.roles.join(",").parse() {
            headers.insert("X-User-Roles", roles);
        }
    }

    let upstream = state
        .http
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body_bytes)
        .send()
        .await;

    match upstream {
        Ok(resp) => {
            if resp.status().is_server_error() {
                breaker.record_failure();
            } else {
                // 4xx is the upstream answering normally, not failing.
                breaker.record_success();
            }
            into_axum_response(resp).await
        }
        Err(e) => {
            warn!("Upstream call to {} failed: {}", route.name, e);
            breaker.record_failure();
            fallback_response(route.fallback_message)
        }
    }
}

fn match_route<'a>(routes: &'a [RouteTarget], path: &str) -> Option<&'a RouteTarget> {
    routes
        .iter()
        .filter(|r| path.starts_with(r.prefix))
        .max_by_key(|r| r.prefix.len())
}

fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|p| path.starts_with(p))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.to_string())
}

/// `/api/orders/7` → `/orders/7`, matching the original gateway's
/// strip-first-segment routing.
fn strip_first_segment(path: &str) -> String {
    let rest = path.trim_start_matches('/');
    match rest.find('/') {
        Some(idx) => rest[idx..].to_string(),
        None => "/".to_string(),
    }
}

/// Hop-by-hop headers stay behind; inbound X-User-* headers are dropped so
/// clients cannot impersonate the gateway's identity injection.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        let lowered = name.as_str().to_ascii_lowercase();
        if matches!(lowered.as_str(), "host" | "content-length" | "connection" | "transfer-encoding")
            || lowered.starts_with("x-user-")
        {
            continue;
        }
        out.insert(name.clone(), value.clone());
    }
    out
}

async fn into_axum_response(resp: reqwest::Response) -> Response {
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = resp.bytes().await.unwrap_or_default();

    let mut builder = Response::builder().status(status);
    for (name, value) in &headers {
        let lowered = name.as_str().to_ascii_lowercase();
        if matches!(lowered.as_str(), "content-length" | "connection" | "transfer-encoding") {
            continue;
        }
        builder = builder.header(name, value);
    }

    builder
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}

fn error_response(status: StatusCode, message: impl Into<String>, path: &str) -> Response {
    (status, Json(ErrorBody::with_path(status, message, path))).into_response()
}

fn fallback_response(message: &str) -> Response {
    let status = StatusCode::SERVICE_UNAVAILABLE;
    (status, Json(ErrorBody::new(status, message))).into_response()
}
