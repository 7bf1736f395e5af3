// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use warden_core::DEFAULT_TTL_MINUTES;

/// Settings for the reference HTTP host.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Port number.
    pub port: u16,
    /// Request timeout.
    pub request_timeout: Duration,
    /// `/get-token` TTL when `expirationMinutes` is omitted.
    pub default_expiration_minutes: i64,
    /// `/get-token` subject when `username` is omitted.
    pub default_subject: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            default_expiration_minutes: DEFAULT_TTL_MINUTES,
            default_subject: "yash".to_string(),
        }
    }
}

impl ApiConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the bind address.
    pub fn with_addr(mut self, host: IpAddr, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the `/get-token` defaults.
    pub fn with_token_defaults(mut self, expiration_minutes: i64, subject: impl Into<String>) -> Self {
        self.default_expiration_minutes = expiration_minutes;
        self.default_subject = subject.into();
        self
    }
}
