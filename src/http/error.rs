use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use error_stack::{Context, Report};
use tracing_error::SpanTrace;

use crate::database;
use crate::http::jwt::{DecodeJwtError, EncodeJwtError};
use crate::util::crypto::{HashPasswordError, VerifyPasswordError};

pub type Result<T> = std::result::Result<T, Error>;

/// Classification of every failure a request handler can produce. Each
/// variant maps to one status code and one client-visible message; the
/// message never distinguishes causes the client must not learn apart
/// (unknown username vs. wrong password, missing vs. foreign-owned row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredentials,
    Unauthenticated,
    NotFound,
    InvalidInput(String),
    Unavailable,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidInput(..) => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidCredentials => "Invalid username or password",
            Self::Unauthenticated => "Authentication required",
            Self::NotFound => "Resource not found",
            Self::InvalidInput(message) => message,
            Self::Unavailable => "Service is temporarily unavailable",
            Self::Internal => "Internal server error",
        }
    }
}

pub struct Error {
    kind: ErrorKind,
    report: Option<Report<Box<dyn Context>>>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            report: None,
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_context(kind: ErrorKind, context: impl Context) -> Self {
        Self {
            kind,
            report: Some(to_any_report(context)),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_report(kind: ErrorKind, report: Report<impl Context>) -> Self {
        Self {
            kind,
            report: Some(cast_to_any_report(report)),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.message())?;
        if let Some(report) = self.report.as_ref() {
            writeln!(f, ": {report:?}")?;
            std::fmt::Display::fmt(&self.trace, f)?;
        }
        Ok(())
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.status_code().is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!("request rejected: {self}");
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.kind.message(),
        }))
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::Unavailable => Error::from_report(ErrorKind::Unavailable, value),
            database::Error::Query => Error::from_report(ErrorKind::Internal, value),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(value: validator::ValidationErrors) -> Self {
        Error::new(ErrorKind::InvalidInput(value.to_string()))
    }
}

impl From<DecodeJwtError> for Error {
    fn from(value: DecodeJwtError) -> Self {
        Error::from_context(ErrorKind::Unauthenticated, value)
    }
}

impl From<Report<EncodeJwtError>> for Error {
    fn from(value: Report<EncodeJwtError>) -> Self {
        Error::from_report(ErrorKind::Internal, value)
    }
}

impl From<Report<HashPasswordError>> for Error {
    fn from(value: Report<HashPasswordError>) -> Self {
        Error::from_report(ErrorKind::Internal, value)
    }
}

impl From<Report<VerifyPasswordError>> for Error {
    fn from(value: Report<VerifyPasswordError>) -> Self {
        Error::from_report(ErrorKind::Internal, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Error::from_context(ErrorKind::Internal, value)
    }
}

fn cast_to_any_report(report: Report<impl Context>) -> Report<Box<dyn Context>> {
    // Report's type parameter is phantom, so this only erases it.
    unsafe { std::mem::transmute::<_, Report<Box<dyn Context>>>(report) }
}

fn to_any_report(context: impl Context) -> Report<Box<dyn Context>> {
    unsafe { std::mem::transmute::<_, Report<Box<dyn Context>>>(Report::new(context)) }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use error_stack::Report;

    use crate::database;

    #[test]
    fn maps_kinds_to_status_codes() {
        let cases = [
            (ErrorKind::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ErrorKind::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (
                ErrorKind::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ErrorKind::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (kind, status) in cases {
            assert_eq!(Error::new(kind).status_code(), status);
        }
    }

    // Credential failures must read identically no matter which check
    // rejected the attempt.
    #[test]
    fn credential_failures_are_indistinguishable() {
        let unknown_user = Error::new(ErrorKind::InvalidCredentials);
        let wrong_password = Error::from_context(
            ErrorKind::InvalidCredentials,
            std::io::Error::new(std::io::ErrorKind::Other, "password mismatch"),
        );

        assert_eq!(unknown_user.kind().message(), wrong_password.kind().message());
        assert_eq!(unknown_user.status_code(), wrong_password.status_code());
    }

    #[test]
    fn unavailable_store_maps_to_service_unavailable() {
        let report = Report::new(database::Error::Unavailable);
        let error = Error::from(report);
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let report = Report::new(database::Error::Query);
        let error = Error::from(report);
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
