//! Request context supplied by external collaborators.
//!
//! The engine trusts the identity fields verbatim and performs no
//! verification of its own; they exist purely to enrich audit records.
//! Absent fields are recorded as unset.

/// Caller identity and request metadata attached to a decision for audit
/// enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestContext {
    user_id: Option<String>,
    ip: Option<String>,
    user_agent: Option<String>,
}

impl RequestContext {
    /// Create an empty context. All fields are recorded as unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context for a known user.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ip: None,
            user_agent: None,
        }
    }

    /// Attach the caller's IP address.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Attach the caller's user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Get the user id, if supplied.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Get the IP address, if supplied.
    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    /// Get the user agent, if supplied.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Fill any unset field from `defaults`, leaving supplied fields as-is.
    /// Used by the query facade to inject the current caller's identity into
    /// calls that omit it.
    pub fn or_defaults(&self, defaults: &RequestContext) -> RequestContext {
        RequestContext {
            user_id: self
                .user_id
                .clone()
                .or_else(|| defaults.user_id.clone()),
            ip: self.ip.clone().or_else(|| defaults.ip.clone()),
            user_agent: self
                .user_agent
                .clone()
                .or_else(|| defaults.user_agent.clone()),
        }
    }
}
