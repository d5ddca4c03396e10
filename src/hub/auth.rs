// file: src/hub/auth.rs
// description: injected credential lookup for hub authentication
// reference: internal dependency injection

/// Supplies an optional bearer token for hub requests. Absence means
/// anonymous access.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Reads the token from a process environment variable, the way the
/// original batch jobs were deployed. Blank values count as absent.
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentials {
    fn token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Fixed credentials, mainly for tests and dry runs.
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}
