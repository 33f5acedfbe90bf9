use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostGenError {
    #[error("Validation Failed: {0}")]
    Validation(String),

    #[error("Authentication Failed: {0}")]
    Auth(String),

    #[error("Upstream Error: {0}")]
    Upstream(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PostGenError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PostGenError::Upstream(format!("request timed out: {e}"))
        } else {
            PostGenError::Upstream(e.to_string())
        }
    }
}

impl From<serde_json::Error> for PostGenError {
    fn from(e: serde_json::Error) -> Self {
        PostGenError::Upstream(format!("malformed response: {e}"))
    }
}
