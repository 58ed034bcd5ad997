//! Per-request cancellation token.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::state::AppState;

/// A child of the server shutdown token scoped to one request.
///
/// The token is cancelled when the server shuts down, or when the handler
/// future is dropped because the client went away.
#[derive(Debug)]
pub struct RequestCancellation {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestCancellation {
    /// Token to hand to service calls.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl FromRequestParts<AppState> for RequestCancellation {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state.shutdown.child_token();
        let guard = token.clone().drop_guard();
        Ok(Self {
            token,
            _guard: guard,
        })
    }
}
