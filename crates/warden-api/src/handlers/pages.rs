// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Fixed-text pages, one per access tier.

use axum::Json;
use warden_core::Principal;

use crate::extractors::Auth;

/// GET /welcome (permitted)
pub async fn welcome() -> &'static str {
    "Welcome to the security"
}

/// GET /home (authenticated)
pub async fn home() -> &'static str {
    "Home Page"
}

/// GET /admin (role-gated)
pub async fn admin() -> &'static str {
    "Admin Page"
}

/// GET /me
///
/// Echoes the principal the gate established for this request.
pub async fn current_principal(Auth(principal): Auth) -> Json<Principal> {
    Json(principal)
}
