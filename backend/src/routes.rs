use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};
use serde::{Deserialize, Serialize};
use shared::types::{AnalyzeResponse, ImagePayload};
use std::io::Write;

use crate::analysis::service::AnalysisService;

const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Deserialize)]
pub struct DetailRequest {
    disease_name: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/analyze").route(web::post().to(handle_analyze)))
        .service(web::resource("/details").route(web::post().to(handle_details)));
}

async fn handle_analyze(
    service: web::Data<AnalysisService>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut image_data = Vec::new();
    let mut file_name: Option<String> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        if file_name.is_none() {
            file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(|name| name.to_string());
        }
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            image_data.write_all(&data)?;
            if image_data.len() > MAX_IMAGE_BYTES {
                return Ok(HttpResponse::BadRequest().json(ErrorResponse {
                    detail: "Image exceeds the upload size limit".into(),
                }));
            }
        }
    }

    if image_data.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            detail: "Invalid image file: no readable upload field".into(),
        }));
    }

    let image = ImagePayload::from_file_name(image_data, file_name.as_deref());
    info!(
        "Analyzing uploaded image ({} bytes, {})",
        image.data.len(),
        image.media_type
    );

    match service.analyze_image(&image).await {
        Ok(analysis) => Ok(HttpResponse::Ok().json(AnalyzeResponse::from_analysis(analysis))),
        Err(e) => {
            error!("Vision analysis failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(ErrorResponse {
                detail: "Vision provider unavailable".into(),
            }))
        }
    }
}

async fn handle_details(
    service: web::Data<AnalysisService>,
    request: web::Json<DetailRequest>,
) -> HttpResponse {
    let details = service.disease_details(&request.disease_name).await;
    HttpResponse::Ok().json(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use shared::providers::{
        DetailChain, ProviderError, VisionChain, VisionProvider,
    };
    use shared::types::{DiseaseDetails, VisionAnalysis};

    struct StubVision {
        fail: bool,
    }

    #[async_trait]
    impl VisionProvider for StubVision {
        fn name(&self) -> &str {
            "stub"
        }

        async fn analyze(&self, _image: &ImagePayload) -> Result<VisionAnalysis, ProviderError> {
            if self.fail {
                Err(ProviderError::EmptyCompletion)
            } else {
                Ok(VisionAnalysis {
                    plant_name: "Tomat".into(),
                    disease_name: "Sehat".into(),
                    confidence: 0.95,
                    reasons: vec![],
                    details: DiseaseDetails::default(),
                })
            }
        }
    }

    fn service_with(fail: bool) -> AnalysisService {
        AnalysisService::with_chains(
            VisionChain::new(vec![Box::new(StubVision { fail })]),
            DetailChain::new(vec![]),
        )
    }

    fn multipart_upload(file_name: &str, bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    #[actix_web::test]
    async fn analyze_reshapes_vision_result_into_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service_with(false)))
                .configure(configure_routes),
        )
        .await;

        let (content_type, body) = multipart_upload("healthy_leaf.jpg", &[0xFF, 0xD8, 0xFF]);
        let request = test::TestRequest::post()
            .uri("/analyze")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["prediction"], "Sehat");
        assert_eq!(body["plant"], "Tomat");
        assert_eq!(body["accuracy"], "95.00%");
    }

    #[actix_web::test]
    async fn provider_failure_maps_to_service_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service_with(true)))
                .configure(configure_routes),
        )
        .await;

        let (content_type, body) = multipart_upload("leaf.jpg", &[0xFF, 0xD8, 0xFF]);
        let request = test::TestRequest::post()
            .uri("/analyze")
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn upload_without_file_is_a_client_error() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service_with(false)))
                .configure(configure_routes),
        )
        .await;

        let boundary = "test-boundary";
        let request = test::TestRequest::post()
            .uri("/analyze")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            ))
            .set_payload(format!("--{boundary}--\r\n"))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn details_endpoint_reports_missing_credentials() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service_with(false)))
                .configure(configure_routes),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/details")
            .set_json(serde_json::json!({"disease_name": "Late Blight"}))
            .to_request();

        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["error"], "API Key not configured");
        assert_eq!(body["summary"], "Cannot fetch details.");
    }
}
