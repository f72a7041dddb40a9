use serde::{Deserialize, Serialize};

use crate::rendering::markdown::render_preview;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub markdown: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// Sanitized HTML.
    pub html: String,
}

pub fn process_preview(request: PreviewRequest) -> PreviewResponse {
    PreviewResponse {
        html: render_preview(&request.markdown),
    }
}

/// `POST /api/v1/preview`
#[cfg(feature = "ssr")]
pub async fn preview_handler(
    _staff: crate::auth::models::StaffUser,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> axum::Json<PreviewResponse> {
    axum::Json(process_preview(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_sanitizes() {
        let response = process_preview(PreviewRequest {
            markdown: "**hi**<script>alert(1)</script>".into(),
        });
        assert!(response.html.contains("<strong>hi</strong>"));
        assert!(!response.html.contains("script"));
    }
}
