// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Handlers for the reference host.
//!
//! - [`pages`]: fixed-text pages behind each access tier
//! - [`token`]: token issuance, validation, and subject extraction

mod pages;
mod token;

pub use pages::*;
pub use token::*;
