use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TourOpsError {
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Vehicle catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TourOpsError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl TourOpsError {
    fn label(&self) -> &'static str {
        match self {
            TourOpsError::InvalidDateRange { .. } => "invalid_date_range",
            TourOpsError::Validation(_) => "validation_error",
            TourOpsError::NotFound(_) => "not_found",
            TourOpsError::InvalidId(_) => "invalid_id",
            TourOpsError::Database(_) => "database_error",
            TourOpsError::CatalogUnavailable(_) => "catalog_unavailable",
        }
    }
}

impl ResponseError for TourOpsError {
    fn status_code(&self) -> StatusCode {
        match self {
            TourOpsError::InvalidDateRange { .. }
            | TourOpsError::Validation(_)
            | TourOpsError::InvalidId(_) => StatusCode::BAD_REQUEST,
            TourOpsError::NotFound(_) => StatusCode::NOT_FOUND,
            TourOpsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TourOpsError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.label(),
            message: self.to_string(),
        })
    }
}
