use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    Json,
};
use contracts::domain::a001_document::aggregate::{
    DocumentId, DocumentListQuery, DocumentListResponse, DocumentSnapshot, SetProcessedRequest,
    TestDataSummary, UpdateMetadataRequest,
};
use contracts::domain::a001_document::history::DocumentHistoryEntry;
use contracts::domain::a001_document::metadata::MetadataFieldName;
use contracts::domain::a001_document::options::{MetadataOption, OptionsContext};
use serde_json::{json, Value};

use crate::domain::a001_document::error::DocumentError;
use crate::domain::a001_document::options::{self, OptionsError};
use crate::domain::a001_document::service;
use crate::shared::config;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

fn error_body(status: StatusCode, message: impl ToString, code: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "error": message.to_string(), "code": code })),
    )
}

fn document_error(e: DocumentError) -> (StatusCode, Json<Value>) {
    match e {
        DocumentError::NotFound(_) => error_body(StatusCode::NOT_FOUND, &e, "NOT_FOUND"),
        DocumentError::Conflict(_) => error_body(StatusCode::CONFLICT, &e, "CONFLICT"),
        DocumentError::Relationship(ref rel) => {
            error_body(StatusCode::UNPROCESSABLE_ENTITY, rel, rel.code())
        }
        DocumentError::InvalidField { .. } => {
            error_body(StatusCode::UNPROCESSABLE_ENTITY, &e, "INVALID_FIELD")
        }
        DocumentError::Database(ref err) => {
            tracing::error!("Document operation failed: {:#}", err);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "INTERNAL")
        }
    }
}

/// Acting user: `x-user` header, else the configured default
fn actor(headers: &HeaderMap) -> String {
    headers
        .get("x-user")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config::get().documents.default_actor.clone())
}

/// GET /api/a001/documents
pub async fn list(Query(query): Query<DocumentListQuery>) -> ApiResult<DocumentListResponse> {
    match service::list(&query).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => Err(document_error(e.into())),
    }
}

/// GET /api/a001/documents/:id
pub async fn get_by_id(Path(id): Path<i64>) -> ApiResult<DocumentSnapshot> {
    service::get(DocumentId(id))
        .await
        .map(Json)
        .map_err(document_error)
}

/// PUT /api/a001/documents/:id/metadata
pub async fn update_metadata(
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<UpdateMetadataRequest>,
) -> ApiResult<DocumentSnapshot> {
    service::update_metadata(DocumentId(id), &request, &actor(&headers))
        .await
        .map(Json)
        .map_err(document_error)
}

/// POST /api/a001/documents/:id/processed
pub async fn set_processed(
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<SetProcessedRequest>,
) -> ApiResult<DocumentSnapshot> {
    service::set_processed(DocumentId(id), request.is_processed, &actor(&headers))
        .await
        .map(Json)
        .map_err(document_error)
}

/// DELETE /api/a001/documents/:id
pub async fn trash(Path(id): Path<i64>, headers: HeaderMap) -> ApiResult<DocumentSnapshot> {
    service::trash(DocumentId(id), &actor(&headers))
        .await
        .map(Json)
        .map_err(document_error)
}

/// POST /api/a001/documents/:id/restore
pub async fn restore(Path(id): Path<i64>, headers: HeaderMap) -> ApiResult<DocumentSnapshot> {
    service::restore(DocumentId(id), &actor(&headers))
        .await
        .map(Json)
        .map_err(document_error)
}

/// GET /api/a001/documents/:id/history
pub async fn history(Path(id): Path<i64>) -> ApiResult<Vec<DocumentHistoryEntry>> {
    service::history(DocumentId(id))
        .await
        .map(Json)
        .map_err(document_error)
}

/// GET /api/a001/metadata/options/:field
pub async fn metadata_options(
    Path(field): Path<String>,
    Query(ctx): Query<OptionsContext>,
) -> ApiResult<Vec<MetadataOption>> {
    let field = MetadataFieldName::parse(&field).ok_or_else(|| {
        error_body(
            StatusCode::NOT_FOUND,
            format!("Unknown metadata field {}", field),
            "UNKNOWN_FIELD",
        )
    })?;
    match options::list_options(field, &ctx).await {
        Ok(v) => Ok(Json(v)),
        Err(OptionsError::MissingParent(e)) => Err(error_body(StatusCode::BAD_REQUEST, e, e.code())),
        Err(OptionsError::Database(e)) => Err(document_error(e.into())),
    }
}

/// POST /api/a001/documents/testdata
pub async fn insert_test_data() -> ApiResult<TestDataSummary> {
    match service::insert_test_data().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => Err(document_error(e.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_document::error::RelationshipError;
    use axum::http::HeaderValue;
    use contracts::domain::a001_document::validation::FieldError;

    #[test]
    fn test_error_status_mapping() {
        let (status, body) = document_error(DocumentError::NotFound(DocumentId(3)));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.0["error"], "Document 3 not found");

        let (status, _) = document_error(DocumentError::Conflict("processed".into()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = document_error(RelationshipError::ClaimantWithoutLoss.into());
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.0["code"], "CLAIMANT_WITHOUT_LOSS");

        let (status, body) = document_error(anyhow::anyhow!("disk full").into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0["error"], "Internal server error");
    }

    #[test]
    fn test_missing_parent_body() {
        let e = FieldError::PolicyRequiredForLoss;
        let (status, body) = error_body(StatusCode::BAD_REQUEST, e, e.code());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0["code"], "POLICY_REQUIRED_FOR_LOSS");
    }

    #[test]
    fn test_actor_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user", HeaderValue::from_static(" jdoe "));
        assert_eq!(actor(&headers), "jdoe");
        assert_eq!(actor(&HeaderMap::new()), config::get().documents.default_actor);
    }
}
