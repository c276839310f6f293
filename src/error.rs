use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use crate::guard::ENTRY_ROUTE;
use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("application state is not registered")]
    MissingState,
    #[error("failed to sign session: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::SEE_OTHER,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, ENTRY_ROUTE))
                .finish(),
            _ => {
                error!(error = %self, "request failed");
                HttpResponse::InternalServerError()
                    .content_type("text/html; charset=utf-8")
                    .body(views::error_page("Something went wrong. Please try again."))
            }
        }
    }
}
