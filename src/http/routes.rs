//! Report HTTP handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use super::SharedState;
use crate::report_core::{ActivityReportRow, CommentReportRow, ReportError};
use crate::store::StoreError;

/// `?login=` query shared by both reports
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub login: String,
}

/// Envelope for report rows
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse<T> {
    pub result: Vec<T>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Failure of one report request
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("report did not finish within {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Report(ReportError::Store(StoreError::Connectivity { .. })) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("❌ {} {}", status.as_u16(), self);
        } else {
            log::warn!("⚠️  {} {}", status.as_u16(), self);
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

async fn bounded<T, F>(limit: Duration, report: F) -> Result<Json<ReportResponse<T>>, ApiError>
where
    F: Future<Output = Result<Vec<T>, ReportError>>,
{
    // A store read already on the blocking pool keeps its connection until it returns
    let rows = tokio::time::timeout(limit, report)
        .await
        .map_err(|_| ApiError::Timeout(limit))??;

    Ok(Json(ReportResponse { result: rows }))
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

/// GET /comments/?login=
pub async fn comments(
    State(state): State<SharedState>,
    query: Result<Query<LoginQuery>, QueryRejection>,
) -> Result<Json<ReportResponse<CommentReportRow>>, ApiError> {
    let Query(query) = query?;
    bounded(state.request_timeout, state.service.comment_report(&query.login)).await
}

/// GET /general/?login=
pub async fn general(
    State(state): State<SharedState>,
    query: Result<Query<LoginQuery>, QueryRejection>,
) -> Result<Json<ReportResponse<ActivityReportRow>>, ApiError> {
    let Query(query) = query?;
    bounded(state.request_timeout, state.service.activity_report(&query.login)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn connectivity() -> ReportError {
        ReportError::Store(StoreError::Connectivity {
            store: "logs".to_string(),
            source: rusqlite::Error::InvalidPath(PathBuf::from("/nope")),
        })
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(connectivity()).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::from(ReportError::MalformedGroup {
                report: "general-activity",
                field: "date",
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ReportError::Store(StoreError::Query {
                store: "authors".to_string(),
                table: "post".to_string(),
                source: rusqlite::Error::QueryReturnedNoRows,
            }))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Timeout(Duration::from_millis(5)).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<Vec<CommentReportRow>, ReportError>(Vec::new())
        };

        let err = bounded(Duration::from_millis(10), slow).await.unwrap_err();

        assert!(matches!(err, ApiError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_bounded_passes_rows_through() {
        let fast = async { Ok::<_, ReportError>(vec![1u64, 2, 3]) };

        let Json(body) = bounded(Duration::from_secs(1), fast).await.unwrap();

        assert_eq!(body.result, vec![1, 2, 3]);
    }
}
