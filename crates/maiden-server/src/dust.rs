//! HTTP handlers for the dust resource tree.
//!
//! Each handler extracts the resource name from the wildcard segment, hands
//! it to [`DustStore`], and turns the outcome into JSON. Status codes are
//! chosen per operation; see [`ApiError`] for the mappings.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Form, Json};
use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, FromRequest, Multipart, Path, Query, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use maiden_kernel::{DustStore, Listing, Resource};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::info;

use crate::constants::{RENAME_FIELD, UPLOAD_FIELD};
use crate::error::ApiError;

/// `{"message": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Rename result: the new resource URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct Renamed {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteQuery {
    kind: Option<String>,
}

/// `GET {prefix}`
pub async fn root_listing(
    Extension(store): Extension<Arc<DustStore>>,
) -> Result<Json<Listing>, ApiError> {
    store
        .list("")
        .await
        .map(Json)
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// `GET {prefix}/{name}`: a listing for directories, raw bytes otherwise.
pub async fn get_resource(
    Extension(store): Extension<Arc<DustStore>>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    match store.stat(&name).await.map_err(ApiError::lookup)? {
        Resource::Directory(_) => {
            let listing = store.list(&name).await.map_err(ApiError::listing)?;
            Ok(Json(listing).into_response())
        }
        Resource::File(path) => {
            let Ok(response) = ServeFile::new(path).oneshot(request).await;
            file_response(response.map(Body::new), &name)
        }
    }
}

/// Pass a file response through, turning the failures `ServeFile` reports
/// with an empty body (file gone or unreadable after the stat) into JSON
/// errors.
fn file_response(response: Response, name: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound(format!("not found: {name}")))
    } else if status.is_server_error() {
        Err(ApiError::Internal(format!("failed to read {name}")))
    } else {
        Ok(response)
    }
}

/// `PUT {prefix}/{name}`: `?kind=directory` creates a directory, anything
/// else expects a multipart upload in the `value` field.
pub async fn write_resource(
    Extension(store): Extension<Arc<DustStore>>,
    Path(name): Path<String>,
    query: Result<Query<WriteQuery>, QueryRejection>,
    request: Request,
) -> Result<Json<Message>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if query.kind.as_deref() == Some("directory") {
        store.create_dir(&name).await.map_err(ApiError::saving)?;
        info!(name = %name, "created directory");
        return Ok(Message::new(format!("created directory {name}")));
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        store
            .store_file(&name, &content)
            .await
            .map_err(ApiError::saving)?;
        info!(name = %name, size = content.len(), "uploaded file");
        return Ok(Message::new(format!(
            "uploaded {file_name} ({} bytes) to {name}",
            content.len()
        )));
    }

    Err(ApiError::BadRequest(format!(
        "missing '{UPLOAD_FIELD}' field in form"
    )))
}

/// `PATCH {prefix}/{name}`: rename within the parent directory.
pub async fn rename_resource(
    Extension(store): Extension<Arc<DustStore>>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Json<Renamed>, ApiError> {
    let new_name = form_field(request, RENAME_FIELD).await;
    let url = store
        .rename(&name, new_name.as_deref())
        .await
        .map_err(ApiError::lookup)?;
    info!(name = %name, url = %url, "renamed");
    Ok(Json(Renamed { url }))
}

/// `DELETE {prefix}/{name}`: remove a file or a whole subtree.
pub async fn delete_resource(
    Extension(store): Extension<Arc<DustStore>>,
    Path(name): Path<String>,
) -> Result<Json<Message>, ApiError> {
    store.delete(&name).await.map_err(ApiError::lookup)?;
    info!(name = %name, "deleted");
    Ok(Message::new(format!("deleted {name}")))
}

/// Read one field from a urlencoded or multipart form body.
///
/// An unreadable body counts as a missing field.
async fn form_field(request: Request, key: &str) -> Option<String> {
    let multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if multipart {
        let mut multipart = Multipart::from_request(request, &()).await.ok()?;
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() == Some(key) {
                return field.text().await.ok();
            }
        }
        None
    } else {
        let Form(mut form) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .ok()?;
        form.remove(key)
    }
}
