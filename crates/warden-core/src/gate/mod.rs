// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authorization gate.
//!
//! A request moves `Received → Classified → Allowed | Denied(reason)`:
//!
//! 1. The path is classified by the [`AccessPolicy`].
//! 2. `Permit` is allowed without looking at credentials.
//! 3. Otherwise a credential is required. The token-validation filter runs
//!    first; requests without a bearer token may be handed to the OAuth flow.
//! 4. Role-gated paths additionally check the principal's roles.
//!
//! The gate is immutable after [`AuthorizationGateBuilder::build`] and is
//! shared across requests without locking.

pub mod collaborators;
pub mod context;
pub mod filter;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, trace, warn};

use crate::config::{GateConfig, LoginConfig};
use crate::error::{CoreResult, WardenError};
use crate::policy::{AccessPolicy, Decision};
use crate::token::TokenService;

use self::collaborators::{CsrfGuard, NoRoles, OAuthHandoff, OAuthLoginFlow, RoleResolver};
use self::context::{AuthMethod, DenyReason, Principal, RequestContext, Verdict};
use self::filter::{BearerTokenFilter, CredentialFilter, FilterOutcome};

// =============================================================================
// PipelineStage
// =============================================================================

/// Stages the gate runs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// CSRF check for state-changing methods.
    Csrf,
    /// Bearer token validation.
    TokenValidation,
    /// OAuth login hand-off.
    OAuthLogin,
    /// Form login (credential collection, handled by the host).
    FormLogin,
}

impl PipelineStage {
    /// Returns `true` for stages that collect credentials from the user.
    pub fn collects_credentials(&self) -> bool {
        matches!(self, Self::OAuthLogin | Self::FormLogin)
    }
}

enum TokenValidation {
    Disabled,
    Active(Arc<dyn CredentialFilter>),
    Unavailable,
}

// =============================================================================
// AuthorizationGate
// =============================================================================

/// Decides whether each request may proceed.
pub struct AuthorizationGate {
    policy: AccessPolicy,
    token_validation: TokenValidation,
    csrf_guard: Option<Arc<dyn CsrfGuard>>,
    oauth: Option<Arc<dyn OAuthLoginFlow>>,
    role_resolver: Arc<dyn RoleResolver>,
    login: LoginConfig,
    pipeline: Vec<PipelineStage>,
}

impl AuthorizationGate {
    /// Starts building a gate from a configuration.
    pub fn builder(config: GateConfig) -> AuthorizationGateBuilder {
        AuthorizationGateBuilder::new(config)
    }

    /// The compiled access policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Active stages in execution order.
    pub fn pipeline(&self) -> &[PipelineStage] {
        &self.pipeline
    }

    /// Effective form login settings.
    pub fn login(&self) -> &LoginConfig {
        &self.login
    }

    /// Returns `true` if bearer tokens are being validated.
    pub fn token_validation_active(&self) -> bool {
        matches!(self.token_validation, TokenValidation::Active(_))
    }

    /// Returns `true` if the OAuth flow initialized and is in use.
    pub fn oauth_active(&self) -> bool {
        self.oauth.is_some()
    }

    /// Evaluates a request, advancing its state and attaching the principal.
    pub fn evaluate(&self, ctx: &mut RequestContext) -> Verdict {
        let decision = self.policy.classify(ctx.path());
        ctx.mark_classified(decision.clone());

        if let Some(guard) = &self.csrf_guard {
            if ctx.is_state_changing() && !guard.verify(ctx) {
                return self.deny(ctx, DenyReason::CsrfRejected);
            }
        }

        if decision == Decision::Permit {
            trace!(request_id = %ctx.request_id(), path = %ctx.path(), "Permitted path");
            return ctx.allow(None);
        }

        let (subject, method) = match self.authenticate(ctx) {
            Ok(identity) => identity,
            Err(reason) => return self.deny(ctx, reason),
        };

        let roles = self.role_resolver.roles_for(&subject);
        let principal = Principal::new(subject, method).with_roles(roles);

        if let Decision::RequireRole(role) = &decision {
            if !principal.has_role(role) {
                return self.deny(
                    ctx,
                    DenyReason::InsufficientRole {
                        required: role.clone(),
                    },
                );
            }
        }

        debug!(
            request_id = %ctx.request_id(),
            path = %ctx.path(),
            subject = %principal.subject,
            decision = %decision,
            "Request allowed"
        );
        ctx.allow(Some(principal))
    }

    fn authenticate(&self, ctx: &RequestContext) -> Result<(String, AuthMethod), DenyReason> {
        match &self.token_validation {
            TokenValidation::Active(filter) => match filter.authenticate(ctx) {
                FilterOutcome::Authenticated { subject } => Ok((subject, AuthMethod::BearerToken)),
                FilterOutcome::Missing => self.collect_credentials(ctx, DenyReason::MissingCredential),
                FilterOutcome::Malformed(_) => Err(DenyReason::MalformedCredential),
                FilterOutcome::Invalid => Err(DenyReason::InvalidCredential),
            },
            TokenValidation::Unavailable => Err(DenyReason::ValidationUnavailable),
            TokenValidation::Disabled => {
                let login = DenyReason::LoginRequired {
                    location: self.login.page_url.clone(),
                };
                self.collect_credentials(ctx, login)
            }
        }
    }

    /// Credential-collecting stages: OAuth when active, then the fallback.
    fn collect_credentials(
        &self,
        ctx: &RequestContext,
        fallback: DenyReason,
    ) -> Result<(String, AuthMethod), DenyReason> {
        let Some(flow) = &self.oauth else {
            return Err(fallback);
        };

        match flow.handoff(ctx) {
            Ok(OAuthHandoff::Authenticated { subject }) => Ok((subject, AuthMethod::OAuth)),
            Ok(OAuthHandoff::Redirect { location }) => Err(DenyReason::LoginRequired { location }),
            Ok(OAuthHandoff::Declined) => Err(fallback),
            Err(e) => {
                warn!(
                    request_id = %ctx.request_id(),
                    flow = flow.name(),
                    error = %e,
                    "OAuth hand-off failed, continuing without OAuth"
                );
                Err(fallback)
            }
        }
    }

    fn deny(&self, ctx: &mut RequestContext, reason: DenyReason) -> Verdict {
        debug!(
            request_id = %ctx.request_id(),
            method = %ctx.method(),
            path = %ctx.path(),
            reason = reason.as_str(),
            "Request denied"
        );
        ctx.deny(reason)
    }
}

impl fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("rules", &self.policy.rule_count())
            .field("pipeline", &self.pipeline)
            .field("token_validation", &self.token_validation_active())
            .field("oauth", &self.oauth_active())
            .field("login_page", &self.login.page_url)
            .finish()
    }
}

// =============================================================================
// AuthorizationGateBuilder
// =============================================================================

/// Builder for [`AuthorizationGate`].
pub struct AuthorizationGateBuilder {
    config: GateConfig,
    token_filter: Option<Arc<dyn CredentialFilter>>,
    role_resolver: Option<Arc<dyn RoleResolver>>,
    csrf_guard: Option<Arc<dyn CsrfGuard>>,
    oauth_flow: Option<Arc<dyn OAuthLoginFlow>>,
    allow_degraded: bool,
}

impl AuthorizationGateBuilder {
    /// Creates a builder.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            token_filter: None,
            role_resolver: None,
            csrf_guard: None,
            oauth_flow: None,
            allow_degraded: false,
        }
    }

    /// Installs the default bearer filter over a token service.
    pub fn token_service(self, tokens: Arc<TokenService>) -> Self {
        self.token_filter(Arc::new(BearerTokenFilter::new(tokens)))
    }

    /// Installs a custom token-validation filter.
    pub fn token_filter(mut self, filter: Arc<dyn CredentialFilter>) -> Self {
        self.token_filter = Some(filter);
        self
    }

    /// Sets the role resolver. Defaults to granting no roles.
    pub fn role_resolver(mut self, resolver: Arc<dyn RoleResolver>) -> Self {
        self.role_resolver = Some(resolver);
        self
    }

    /// Sets the CSRF guard.
    pub fn csrf_guard(mut self, guard: Arc<dyn CsrfGuard>) -> Self {
        self.csrf_guard = Some(guard);
        self
    }

    /// Sets the OAuth login flow.
    pub fn oauth_flow(mut self, flow: Arc<dyn OAuthLoginFlow>) -> Self {
        self.oauth_flow = Some(flow);
        self
    }

    /// When token validation is enabled without a filter, build anyway and
    /// deny protected requests instead of failing.
    pub fn allow_degraded(mut self, allow: bool) -> Self {
        self.allow_degraded = allow;
        self
    }

    /// Builds the gate.
    pub fn build(self) -> CoreResult<AuthorizationGate> {
        let login = effective_login(&self.config.login);

        let mut permitted = vec![login.page_url.clone()];
        if login.processing_url != login.page_url {
            permitted.push(login.processing_url.clone());
        }

        let mut policy = AccessPolicy::builder()
            .permit_all(self.config.permitted_paths.iter().cloned())
            .permit_all(permitted)
            .authenticate_all(self.config.authenticated_paths.iter().cloned());
        for rule in self.config.role_paths.iter() {
            policy = policy.require_role(rule.path.clone(), rule.role.clone());
        }
        let policy = policy.build()?;

        let token_validation = match (self.config.enable_token_validation, self.token_filter) {
            (true, Some(filter)) => TokenValidation::Active(filter),
            (true, None) if self.allow_degraded => {
                error!("Token validation is enabled but no validation filter is installed; protected requests will be denied");
                TokenValidation::Unavailable
            }
            (true, None) => {
                return Err(WardenError::configuration(
                    "token validation is enabled but no token-validation filter is installed",
                ));
            }
            (false, Some(filter)) => {
                debug!(filter = filter.name(), "Token validation disabled, ignoring installed filter");
                TokenValidation::Disabled
            }
            (false, None) => TokenValidation::Disabled,
        };

        let csrf_guard = if self.config.disable_csrf {
            debug!("CSRF protection disabled");
            None
        } else {
            if self.csrf_guard.is_none() {
                warn!("CSRF protection enabled but no guard installed; leaving CSRF to the host");
            }
            self.csrf_guard
        };

        let oauth = if self.config.enable_oauth {
            initialize_oauth(self.oauth_flow)
        } else {
            None
        };

        let mut pipeline = Vec::with_capacity(4);
        if csrf_guard.is_some() {
            pipeline.push(PipelineStage::Csrf);
        }
        if !matches!(token_validation, TokenValidation::Disabled) {
            pipeline.push(PipelineStage::TokenValidation);
        }
        if oauth.is_some() {
            pipeline.push(PipelineStage::OAuthLogin);
        }
        pipeline.push(PipelineStage::FormLogin);

        let gate = AuthorizationGate {
            policy,
            token_validation,
            csrf_guard,
            oauth,
            role_resolver: self.role_resolver.unwrap_or_else(|| Arc::new(NoRoles)),
            login,
            pipeline,
        };

        info!(
            rules = gate.policy.rule_count(),
            token_validation = gate.token_validation_active(),
            oauth = gate.oauth_active(),
            login_page = %gate.login.page_url,
            "Authorization gate ready"
        );

        Ok(gate)
    }
}

fn effective_login(login: &LoginConfig) -> LoginConfig {
    if !login.custom_page {
        return LoginConfig::default();
    }
    if !login.is_complete() {
        error!("Custom login page is enabled but its URLs are incomplete; using the default login page");
        return LoginConfig::default();
    }
    login.clone()
}

fn initialize_oauth(flow: Option<Arc<dyn OAuthLoginFlow>>) -> Option<Arc<dyn OAuthLoginFlow>> {
    let Some(flow) = flow else {
        error!("OAuth is enabled but no login flow is installed; continuing without OAuth");
        return None;
    };

    match flow.initialize() {
        Ok(()) => {
            info!(flow = flow.name(), "OAuth login flow initialized");
            Some(flow)
        }
        Err(e) => {
            error!(flow = flow.name(), error = %e, "OAuth login flow failed to initialize; continuing without OAuth");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
