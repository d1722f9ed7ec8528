use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use zx_records::StoreErr;

/// Every way a request can fail.
///
/// Rendered as `{"error": "<message>"}`. Internal failures are logged
/// with their cause and shown to the client only as "Server error".
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Forbidden")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Already owned")]
    AlreadyOwned,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Server error")]
    Internal(anyhow::Error),
}

impl Rejection {
    pub fn bad(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::Internal(anyhow::anyhow!("{}", cause))
    }
}

impl From<StoreErr> for Rejection {
    fn from(e: StoreErr) -> Self {
        match e {
            StoreErr::Taken => Self::UsernameTaken,
            #[allow(unreachable_patterns)]
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

impl ResponseError for Rejection {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_)
            | Self::InvalidCredentials
            | Self::UsernameTaken
            | Self::InsufficientFunds
            | Self::AlreadyOwned => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Internal(cause) => log::error!("request failed: {:#}", cause),
            rejection => log::debug!("request rejected: {}", rejection),
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}
