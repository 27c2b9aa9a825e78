use std::collections::HashMap;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use storage::models::Role;

use crate::error::WebError;

/// The authenticated caller, stored in request extensions by the auth layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
}

/// Accept any valid key, teacher or admin.
pub async fn require_auth(
    State(api_keys): State<ApiKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let role = api_keys.authenticate(request.headers())?;
    request.extensions_mut().insert(Caller { role });
    Ok(next.run(request).await)
}

/// Accept admin keys only.
pub async fn require_admin(
    State(api_keys): State<ApiKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let role = api_keys.authenticate(request.headers())?;
    if role != Role::Admin {
        tracing::warn!("{} key attempted an admin-only route {}", role, request.uri().path());
        return Err(WebError::Forbidden);
    }
    request.extensions_mut().insert(Caller { role });
    Ok(next.run(request).await)
}

/// Bearer keys mapped to the role they grant.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    keys: HashMap<String, Role>,
}

impl ApiKeys {
    /// Parse `key:ROLE,key2:ROLE`. A key without a role is an admin key;
    /// entries with an unknown role are skipped.
    pub fn from_comma_separated(keys_str: &str) -> Self {
        let keys = keys_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| match entry.rsplit_once(':') {
                Some((key, role)) => match role.trim().parse::<Role>() {
                    Ok(role) => Some((key.trim().to_string(), role)),
                    Err(_) => {
                        tracing::warn!("Ignoring API key with unknown role '{}'", role.trim());
                        None
                    }
                },
                None => Some((entry.to_string(), Role::Admin)),
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();

        Self { keys }
    }

    pub fn role_for(&self, key: &str) -> Option<Role> {
        self.keys.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Role, WebError> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(WebError::Unauthorized)?;

        self.role_for(token).ok_or_else(|| {
            tracing::warn!("Invalid API key attempt");
            WebError::Unauthorized
        })
    }
}
