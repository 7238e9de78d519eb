use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_size;

/// Middleware для логирования HTTP запросов
///
/// Пишет в tracing: метод, путь, статус, длительность и размер ответа.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                %method,
                %path,
                status = parts.status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "response body could not be read: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = parts.status.as_u16();
    let size = format_size(bytes.len());
    if parts.status.is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, %size, "request failed");
    } else if parts.status.is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, %size, "request rejected");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, %size, "request");
    }

    Response::from_parts(parts, Body::from(bytes))
}
