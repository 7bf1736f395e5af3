// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Collaborators
//!
//! Doubles for the gate's pluggable collaborators. Each records how often it
//! was consulted.

use std::sync::atomic::{AtomicUsize, Ordering};

use warden_core::{
    CoreResult, CsrfGuard, OAuthHandoff, OAuthLoginFlow, RequestContext, WardenError,
};

// =============================================================================
// CSRF
// =============================================================================

/// Accepts requests whose CSRF token equals a fixed value.
#[derive(Debug)]
pub struct StaticCsrfGuard {
    expected: String,
    calls: AtomicUsize,
}

impl StaticCsrfGuard {
    /// Creates a guard expecting `expected`.
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests checked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CsrfGuard for StaticCsrfGuard {
    fn verify(&self, ctx: &RequestContext) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ctx.csrf_token() == Some(self.expected.as_str())
    }
}

// =============================================================================
// OAuth
// =============================================================================

/// OAuth flow returning a scripted handoff.
#[derive(Debug)]
pub struct ScriptedOAuthFlow {
    handoff: OAuthHandoff,
    fail_init: bool,
    fail_handoff: bool,
    calls: AtomicUsize,
}

impl ScriptedOAuthFlow {
    /// Flow that always answers with `handoff`.
    pub fn new(handoff: OAuthHandoff) -> Self {
        Self {
            handoff,
            fail_init: false,
            fail_handoff: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Flow that authenticates every request as `subject`.
    pub fn authenticating(subject: impl Into<String>) -> Self {
        Self::new(OAuthHandoff::Authenticated {
            subject: subject.into(),
        })
    }

    /// Flow that redirects every request to `location`.
    pub fn redirecting(location: impl Into<String>) -> Self {
        Self::new(OAuthHandoff::Redirect {
            location: location.into(),
        })
    }

    /// Makes initialization fail.
    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Makes every handoff fail.
    pub fn failing_handoff(mut self) -> Self {
        self.fail_handoff = true;
        self
    }

    /// Number of handoffs attempted.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OAuthLoginFlow for ScriptedOAuthFlow {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&self) -> CoreResult<()> {
        if self.fail_init {
            return Err(WardenError::collaborator("scripted", "client registration missing"));
        }
        Ok(())
    }

    fn handoff(&self, _ctx: &RequestContext) -> CoreResult<OAuthHandoff> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_handoff {
            return Err(WardenError::collaborator("scripted", "provider unreachable"));
        }
        Ok(self.handoff.clone())
    }
}
