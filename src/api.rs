use axum::{
    body::Body,
    extract::{Extension, Query, State},
    http::{header, HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::config::AiConfig;
use crate::ai::gemini::generate_guide;
use crate::annotate::{annotate_response, build_image_link, AnnotateConfig, AnnotatedNode};
use crate::messages;
use crate::version;

#[derive(Clone)]
pub struct ApiState {
    pub http: reqwest::Client,
    pub ai: Option<AiConfig>,
    pub annotate: AnnotateConfig,
}

#[derive(Debug, Deserialize)]
struct GuideRequest {
    city: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct GuideResponse {
    city: String,
    blocks: Vec<AnnotatedNode>,
    image_prompt: String,
    image_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct ProxyParams {
    url: Option<String>,
}

#[derive(Clone, Debug)]
struct RequestContext {
    request_id: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/guide", post(guide))
        .route("/api/proxy", get(proxy))
        .route("/api/info", get(info))
        .with_state(state)
        .layer(middleware::from_fn(assign_request_id))
}

/// One full user query: ask the generator about the city, then run the
/// annotation pipeline over whatever text came back.
async fn guide(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Json(payload): Json<GuideRequest>,
) -> Response {
    let city = payload.city.trim();
    if city.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, messages::CITY_REQUIRED);
    }

    let Some(ai) = state.ai.as_ref() else {
        tracing::debug!(request_id = %request.request_id, "Guide requested but generator is not configured");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, messages::GUIDE_DISABLED);
    };

    let raw = match generate_guide(
        &state.http,
        &ai.api_key,
        &ai.model,
        city,
        ai.api_url.as_deref(),
    )
    .await
    {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(
                request_id = %request.request_id,
                city,
                error = %err,
                "Text generator failed"
            );
            return error_response(StatusCode::BAD_GATEWAY, &messages::generator_error(&err));
        }
    };

    let doc = annotate_response(&raw, city, &state.annotate);
    let image_url = build_image_link(&doc.image_prompt);

    tracing::debug!(
        request_id = %request.request_id,
        city,
        block_count = doc.blocks.len(),
        "Annotated guide"
    );
    (
        StatusCode::OK,
        Json(GuideResponse {
            city: city.to_string(),
            blocks: doc.blocks,
            image_prompt: doc.image_prompt,
            image_url,
        }),
    )
        .into_response()
}

/// Re-serve remote image bytes with a permissive CORS header so the browser
/// accepts them. Pure pass-through, no transformation.
async fn proxy(
    State(state): State<ApiState>,
    Extension(request): Extension<RequestContext>,
    Query(params): Query<ProxyParams>,
) -> Response {
    let Some(url) = params.url.filter(|url| !url.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, messages::PROXY_URL_REQUIRED);
    };

    let resp = match state.http.get(&url).send().await {
        Ok(resp) => resp,
        Err(err) => {
            tracing::warn!(request_id = %request.request_id, url, error = %err, "Image fetch failed");
            return error_response(StatusCode::BAD_GATEWAY, messages::PROXY_FAILED);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        tracing::warn!(request_id = %request.request_id, url, %status, "Image upstream error");
        return error_response(StatusCode::BAD_GATEWAY, messages::PROXY_FAILED);
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/png")
        .to_string();

    let bytes = match resp.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(request_id = %request.request_id, url, error = %err, "Image body read failed");
            return error_response(StatusCode::BAD_GATEWAY, messages::PROXY_FAILED);
        }
    };

    tracing::debug!(
        request_id = %request.request_id,
        url,
        byte_count = bytes.len(),
        "Relayed image"
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        bytes,
    )
        .into_response()
}

async fn info() -> Response {
    (StatusCode::OK, version::describe()).into_response()
}

async fn assign_request_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });
    let method = req.method().clone();
    let uri = req.uri().clone();
    let mut response = next.run(req).await;
    let status = response.status();
    let header_value = match request_id.parse() {
        Ok(value) => value,
        Err(_) => {
            return response;
        }
    };
    response
        .headers_mut()
        .insert(HeaderName::from_static("x-request-id"), header_value);
    tracing::debug!(
        request_id,
        method = %method,
        uri = %uri,
        status = %status,
        "API request completed"
    );
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{EmphasisPolicy, LinkStyle};
    use axum::body::to_bytes;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(ai: Option<AiConfig>) -> ApiState {
        ApiState {
            http: reqwest::Client::new(),
            ai,
            annotate: AnnotateConfig {
                policy: EmphasisPolicy::BracketMarkers,
                link_style: LinkStyle::CityQualified,
            },
        }
    }

    fn gemini_config(server: &MockServer) -> AiConfig {
        AiConfig {
            api_key: "k".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            api_url: Some(server.uri()),
        }
    }

    fn generation_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn guide_rejects_blank_city() {
        let app = router(test_state(None));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/guide")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"city":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn guide_without_generator_is_unavailable() {
        let app = router(test_state(None));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/guide")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"city":"Bangkok"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn guide_annotates_generator_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                generation_body(
                    "### Markets\n\nVisit [Big C] for snacks.\n\nIMAGE_PROMPT: a busy market aisle",
                ),
                "application/json",
            ))
            .mount(&server)
            .await;

        let app = router(test_state(Some(gemini_config(&server))));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/guide")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"city":"Bangkok"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: GuideResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.city, "Bangkok");
        assert_eq!(payload.image_prompt, "a busy market aisle");
        assert!(payload.image_url.contains("a%20busy%20market%20aisle"));

        let AnnotatedNode::Paragraph { children } = &payload.blocks[1] else {
            panic!("expected paragraph, got {:?}", payload.blocks[1]);
        };
        assert!(children.iter().any(|node| matches!(
            node,
            AnnotatedNode::Link { label, .. } if label == "Big C"
        )));
    }

    #[tokio::test]
    async fn guide_surfaces_generator_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/v1beta/models/.+:generateContent$"))
            .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let app = router(test_state(Some(gemini_config(&server))));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/guide")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"city":"Bangkok"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(payload.error.contains("500"));
    }

    #[tokio::test]
    async fn proxy_requires_url() {
        let app = router(test_state(None));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/proxy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn proxy_relays_bytes_with_cors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::path("/scenery.jpg"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"),
            )
            .mount(&server)
            .await;

        let app = router(test_state(None));
        let target = format!("{}/scenery.jpg", server.uri());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/proxy?url={}",
                        percent_encoding::utf8_percent_encode(
                            &target,
                            percent_encoding::NON_ALPHANUMERIC
                        )
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&"*".parse().unwrap())
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&"image/jpeg".parse().unwrap())
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), &[0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn proxy_reports_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::path("/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let app = router(test_state(None));
        let target = format!("{}/missing.png", server.uri());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!(
                        "/api/proxy?url={}",
                        percent_encoding::utf8_percent_encode(
                            &target,
                            percent_encoding::NON_ALPHANUMERIC
                        )
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn info_reports_version() {
        let app = router(test_state(None));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/info")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("martbot"));
    }
}
