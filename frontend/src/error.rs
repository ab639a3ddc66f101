use thiserror::Error;

/// Every failure the client can surface. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),
    #[error("{0}")]
    Application(String),
    #[error("Please sign in to continue.")]
    AuthRequired,
}

impl ClientError {
    /// Whether the overlay should be re-opened for this failure.
    pub fn needs_login(&self) -> bool {
        matches!(self, ClientError::AuthRequired | ClientError::Http { status: 401, .. })
    }
}

impl From<gloo_net::Error> for ClientError {
    fn from(err: gloo_net::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_bare_message() {
        let err = ClientError::Http { status: 500, message: "boom".into() };
        assert_eq!(err.to_string(), "boom");
        assert!(!err.needs_login());
    }

    #[test]
    fn unauthorized_responses_need_login() {
        assert!(ClientError::AuthRequired.needs_login());
        assert!(ClientError::Http { status: 401, message: "Login required".into() }.needs_login());
        assert!(!ClientError::Validation("x".into()).needs_login());
    }
}
