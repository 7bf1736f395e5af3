// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization gate middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    response::Response,
};
use tower::{Layer, Service};
use warden_core::{AuthorizationGate, RequestContext, Verdict};

use crate::error::denial_response;

/// Header carrying the CSRF token for state-changing requests.
pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

/// Header echoing the gate's request id on every response.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

// =============================================================================
// GateLayer
// =============================================================================

/// Layer that runs every request through an [`AuthorizationGate`].
///
/// Allowed requests reach the inner service with the authenticated
/// [`Principal`](warden_core::Principal), if any, stored in the request
/// extensions. Denied requests never reach it.
#[derive(Clone)]
pub struct GateLayer {
    gate: Arc<AuthorizationGate>,
}

impl GateLayer {
    /// Creates a new gate layer.
    pub fn new(gate: Arc<AuthorizationGate>) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateMiddleware {
            inner,
            gate: self.gate.clone(),
        }
    }
}

// =============================================================================
// GateMiddleware
// =============================================================================

/// Middleware produced by [`GateLayer`].
#[derive(Clone)]
pub struct GateMiddleware<S> {
    inner: S,
    gate: Arc<AuthorizationGate>,
}

impl<S> Service<Request<Body>> for GateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut ctx = request_context(&req);
            let request_id = HeaderValue::from_str(&ctx.request_id().to_string()).ok();

            let mut response = match gate.evaluate(&mut ctx) {
                Verdict::Allowed(principal) => {
                    if let Some(principal) = principal {
                        req.extensions_mut().insert(principal);
                    }
                    inner.call(req).await?
                }
                Verdict::Denied(reason) => denial_response(&reason),
            };

            if let Some(request_id) = request_id {
                response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
            }
            Ok(response)
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Builds the gate's view of an HTTP request.
///
/// Non-UTF-8 header bytes are decoded lossily so a garbled credential is
/// judged malformed or invalid rather than absent.
fn request_context<B>(req: &Request<B>) -> RequestContext {
    let mut ctx = RequestContext::new(req.method().as_str(), req.uri().path());

    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        ctx = ctx.with_authorization(String::from_utf8_lossy(value.as_bytes()));
    }
    if let Some(value) = req.headers().get(&CSRF_HEADER) {
        ctx = ctx.with_csrf_token(String::from_utf8_lossy(value.as_bytes()));
    }

    ctx
}

// =============================================================================
// Tests
// =============================================================================
