//! Credential resolution.
//!
//! Precedence, checked on every pass:
//! 1. the value the user typed into the session (trimmed, if non-empty)
//! 2. the first non-empty configured environment variable
//! 3. otherwise the empty credential, which callers treat as "unconfigured"

use ragify_core::Credential;

/// Resolves the backend credential from session input and the environment.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    env_vars: Vec<String>,
}

impl CredentialResolver {
    /// Create a resolver that falls back to `env_vars`, in order.
    pub fn new(env_vars: Vec<String>) -> Self {
        Self { env_vars }
    }

    /// Resolve against the process environment.
    pub fn resolve(&self, user_supplied: Option<&str>) -> Credential {
        self.resolve_with(user_supplied, |name| std::env::var(name).ok())
    }

    /// Resolve with an injected variable lookup.
    pub fn resolve_with(
        &self,
        user_supplied: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Credential {
        let typed = Credential::new(user_supplied.unwrap_or_default());
        if !typed.is_empty() {
            tracing::debug!("Using credential supplied in session");
            return typed;
        }

        for name in &self.env_vars {
            if let Some(value) = lookup(name) {
                let credential = Credential::new(value);
                if !credential.is_empty() {
                    tracing::debug!(source = %name, "Using credential from environment");
                    return credential;
                }
            }
        }

        Credential::empty()
    }

    /// The environment variables this resolver consults.
    pub fn env_vars(&self) -> &[String] {
        &self.env_vars
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(vec!["GOOGLE_API_KEY".into(), "GEMINI_API_KEY".into()])
    }
}
