use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use crate::{
    error::ServiceError,
    qr::{GenerationRequest, Icon},
};

const ICON_FIELD: &str = "icon";

/// `POST /generate` body: a multipart form, or JSON without an icon.
#[derive(Debug)]
pub struct GenerationForm(pub GenerationRequest);

#[async_trait]
impl<S> FromRequest<S> for GenerationForm
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|rejection| {
                ServiceError::Rejected {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
            })?;
            read_multipart(multipart).await.map(Self)
        } else if content_type.starts_with("application/json") {
            let Json(request) = Json::<GenerationRequest>::from_request(req, state)
                .await
                .map_err(|rejection| ServiceError::Rejected {
                    status: rejection.status(),
                    message: rejection.body_text(),
                })?;
            Ok(Self(request))
        } else {
            tracing::debug!(%content_type, "unsupported body, treating as empty form");
            Ok(Self(GenerationRequest::default()))
        }
    }
}

/// Collects the text fields and the single `icon` file, all in memory.
pub async fn read_multipart(mut multipart: Multipart) -> Result<GenerationRequest, ServiceError> {
    let mut request = GenerationRequest::default();
    let mut seen_icon = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == ICON_FIELD {
            if seen_icon {
                return Err(ServiceError::Upload(
                    "Only one icon file may be uploaded.".to_string(),
                ));
            }
            seen_icon = true;

            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            // Browsers send an empty part for an untouched file input.
            if !data.is_empty() {
                request.icon = Some(Icon { file_name, data });
            }
            continue;
        }

        // Only `icon` may carry a file; multer's `single("icon")` rejects the rest.
        if field.file_name().is_some() {
            return Err(ServiceError::Upload(format!(
                "Unexpected file field \"{name}\"."
            )));
        }

        let slot = match name.as_str() {
            "content" => &mut request.content,
            "qrColor" => &mut request.qr_color,
            "bgColor" => &mut request.bg_color,
            "size" => &mut request.size,
            "errorCorrection" => &mut request.error_correction,
            other => {
                tracing::debug!(field = other, "ignoring unknown form field");
                continue;
            }
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok(request)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ServiceError {
    ServiceError::Rejected {
        status: err.status(),
        message: err.body_text(),
    }
}
