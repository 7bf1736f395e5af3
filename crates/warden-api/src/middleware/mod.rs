// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`GateMiddleware`]: per-request authorization through the gate

mod gate;

pub use gate::{GateLayer, GateMiddleware, CSRF_HEADER, REQUEST_ID_HEADER};
