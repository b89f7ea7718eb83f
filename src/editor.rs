use crate::app_state::AppState;
use crate::render::RenderError;
use crate::utils::{escape_markup, status_text};
use actix_web::{
    error::PayloadError,
    http::StatusCode,
    web::{self, Bytes, BytesMut},
    HttpResponse,
};
use futures_util::stream::StreamExt;
use serde::Deserialize;
use uuid::Uuid;

const TEXT_HTML: &str = "text/html; charset=utf-8";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Body of `POST /render`.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(rename = "Data", alias = "data", default)]
    pub data: String,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/render")
            .route(web::post().to(render_markdown))
            .default_service(web::to(method_not_allowed)),
    )
    // Matches "/" and every other path.
    .service(
        web::resource("/{tail:.*}")
            .route(web::get().to(editor_page))
            .default_service(web::to(method_not_allowed)),
    );
}

async fn method_not_allowed() -> HttpResponse {
    status_response(StatusCode::METHOD_NOT_ALLOWED)
}

pub async fn editor_page(data: web::Data<AppState>) -> HttpResponse {
    match data.assets.render_editor() {
        Ok(page) => HttpResponse::Ok().content_type(TEXT_HTML).body(page),
        Err(err) => {
            log::error!("Rendering editor template: {:?}", err);
            status_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn render_markdown(data: web::Data<AppState>, mut payload: web::Payload) -> HttpResponse {
    let request_id = Uuid::new_v4();

    let body = match read_body(&mut payload, data.max_body_bytes).await {
        Ok(body) => body,
        Err(BodyError::TooLarge) => {
            log::info!("[{}] Render request exceeds {} bytes", request_id, data.max_body_bytes);
            return status_response(StatusCode::PAYLOAD_TOO_LARGE);
        }
        Err(BodyError::Payload(err)) => {
            log::error!("[{}] Reading render request body: {}", request_id, err);
            return status_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let request: RenderRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            log::info!("[{}] Malformed render request: {}", request_id, err);
            return status_response(StatusCode::BAD_REQUEST);
        }
    };

    log::info!("[{}] Rendering {} bytes of markdown", request_id, request.data.len());

    match data.renderer.render(Bytes::from(request.data)).await {
        Ok(html) => HttpResponse::Ok().content_type(TEXT_HTML).body(html),
        Err(err) => render_failure(request_id, err),
    }
}

fn render_failure(request_id: Uuid, err: RenderError) -> HttpResponse {
    log::error!("[{}] MarkdownRenderer::render: {}", request_id, err);
    if err.is_credential() {
        log::warn!("If running locally try restarting with the environment variable 'EDITOR_UPSTREAM_UNAUTHENTICATED=1'");
    }

    match err {
        RenderError::NotOk { status, body } => HttpResponse::InternalServerError()
            .content_type(TEXT_HTML)
            .body(upstream_failure_page(status, &body)),
        _ => status_response(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Diagnostic fragment shown in the preview pane when the upstream rejects a render.
fn upstream_failure_page(status: StatusCode, body: &[u8]) -> String {
    format!(
        "<h3>{} ({})</h3>\n<p>The request to the upstream render service failed with the message:</p>\n<p>{}</p>",
        status_text(status),
        status.as_u16(),
        escape_markup(&String::from_utf8_lossy(body))
    )
}

fn status_response(status: StatusCode) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(TEXT_PLAIN)
        .body(status_text(status))
}

enum BodyError {
    TooLarge,
    Payload(PayloadError),
}

async fn read_body(payload: &mut web::Payload, limit: usize) -> Result<BytesMut, BodyError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(BodyError::Payload)?;
        if body.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
