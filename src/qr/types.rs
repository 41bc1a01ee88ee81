use axum::body::Bytes;
use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize};

/// Raw request fields, before any defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub content: Option<String>,
    pub qr_color: Option<String>,
    pub bg_color: Option<String>,
    #[serde(default, deserialize_with = "number_or_text")]
    pub size: Option<String>,
    pub error_correction: Option<String>,
    #[serde(skip)]
    pub icon: Option<Icon>,
}

/// An uploaded logo, held in memory for the lifetime of the request.
#[derive(Debug, Clone)]
pub struct Icon {
    pub file_name: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    #[default]
    High,
}

impl ErrorCorrection {
    /// Unknown levels fall back to `High`, which best tolerates a centered logo.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("l" | "low") => ErrorCorrection::Low,
            Some("m" | "medium") => ErrorCorrection::Medium,
            Some("q" | "quartile") => ErrorCorrection::Quartile,
            _ => ErrorCorrection::High,
        }
    }

    pub fn ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QrOptions {
    pub content: String,
    pub size: u32,
    pub error_correction: ErrorCorrection,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    /// Quiet zone width, in modules.
    pub margin: u32,
}

#[derive(Debug)]
pub struct GenerationJob {
    pub options: QrOptions,
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub qr_code_url: String,
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_correction_accepts_short_and_long_names() {
        assert_eq!(ErrorCorrection::parse_or_default(Some("l")), ErrorCorrection::Low);
        assert_eq!(ErrorCorrection::parse_or_default(Some("M")), ErrorCorrection::Medium);
        assert_eq!(
            ErrorCorrection::parse_or_default(Some("quartile")),
            ErrorCorrection::Quartile
        );
        assert_eq!(ErrorCorrection::parse_or_default(Some("H")), ErrorCorrection::High);
    }

    #[test]
    fn unknown_error_correction_falls_back_to_high() {
        assert_eq!(ErrorCorrection::parse_or_default(Some("Z")), ErrorCorrection::High);
        assert_eq!(ErrorCorrection::parse_or_default(Some("")), ErrorCorrection::High);
        assert_eq!(ErrorCorrection::parse_or_default(None), ErrorCorrection::High);
    }

    #[test]
    fn json_size_may_be_number_or_string() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"content":"hi","size":256}"#).unwrap();
        assert_eq!(req.size.as_deref(), Some("256"));

        let req: GenerationRequest =
            serde_json::from_str(r##"{"content":"hi","size":"300","qrColor":"#ff0000"}"##).unwrap();
        assert_eq!(req.size.as_deref(), Some("300"));
        assert_eq!(req.qr_color.as_deref(), Some("#ff0000"));

        let req: GenerationRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert!(req.size.is_none());
    }
}
