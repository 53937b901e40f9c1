use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::Field},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::warn;

use medinv_core::ServiceError;

use super::AppState;

pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/uploads/{*path}", get(serve_upload))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    file_path: String,
}

/// Accept `multipart/form-data` with a `file` part and a `deviceId` part.
async fn upload(
    State(svc): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServiceError> {
    let mut device_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("deviceId") => device_id = Some(field.text().await.map_err(malformed)?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = read_field(field).await?;
                file = Some((file_name, data));
            }
            other => warn!("upload: ignoring multipart part {:?}", other),
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| ServiceError::Validation("No file uploaded".to_string()))?;
    let device_id =
        device_id.ok_or_else(|| ServiceError::Validation("deviceId is required".to_string()))?;

    let stored = svc.store_attachment(&device_id, &file_name, &data)?;
    Ok(Json(UploadResponse {
        success: true,
        file_path: stored.file_path,
    }))
}

async fn read_field(mut field: Field<'_>) -> Result<Vec<u8>, ServiceError> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}

fn malformed(e: axum::extract::multipart::MultipartError) -> ServiceError {
    ServiceError::Validation(format!("malformed upload: {}", e.body_text()))
}

/// Serve a stored attachment back by its reference path.
async fn serve_upload(
    State(svc): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let data = svc.fetch_attachment(&path)?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&path)),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    ))
}

/// Content type from the file extension. Anything that isn't a raster image
/// or a PDF is served as bytes, SVG included, since it can carry script.
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("devices/1/1-a.PNG"), "image/png");
        assert_eq!(content_type_for("devices/1/1-a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("devices/1/1-manual.pdf"), "application/pdf");
        assert_eq!(content_type_for("devices/1/1-noext"), "application/octet-stream");
        assert_eq!(content_type_for("devices/1/1-logo.svg"), "application/octet-stream");
    }
}
