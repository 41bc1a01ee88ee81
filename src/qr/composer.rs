use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, RgbaImage};
use tokio::task;

use crate::{
    error::ServiceError,
    qr::{
        icon::apply_icon,
        render::render_code,
        types::{GenerationJob, GenerationResponse},
    },
};

pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Runs the render pipeline on the blocking pool so other requests keep flowing.
pub async fn compose(job: GenerationJob) -> Result<GenerationResponse, ServiceError> {
    task::spawn_blocking(move || compose_blocking(&job))
        .await
        .map_err(|err| ServiceError::Task(err.to_string()))?
}

pub fn compose_blocking(job: &GenerationJob) -> Result<GenerationResponse, ServiceError> {
    let mut code = render_code(&job.options)?;

    if let Some(icon) = job.icon.as_ref() {
        tracing::debug!(
            file_name = icon.file_name.as_deref().unwrap_or("<unnamed>"),
            "compositing icon"
        );
        apply_icon(&mut code, &icon.data)?;
    }

    let png = encode_png(&code)?;
    Ok(GenerationResponse {
        qr_code_url: format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png)),
    })
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ServiceError> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}
