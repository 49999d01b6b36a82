use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_bytes;

/// ANSI-цвет строки по классу статуса
fn status_color(status: StatusCode) -> &'static str {
    if status.is_success() {
        "36"
    } else if status.is_client_error() {
        "33"
    } else if status.is_server_error() {
        "31"
    } else {
        "37"
    }
}

/// Middleware для логирования HTTP запросов
///
/// Одна строка на запрос: время, длительность, размер ответа, статус, метод, путь.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let (body, size) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let size = format_bytes(bytes.len());
            (Body::from(bytes), size)
        }
        Err(_) => (Body::default(), "error".to_string()),
    };

    println!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>9} | {} {:>6} {}",
        status_color(parts.status),
        Local::now().format("%H:%M:%S"),
        start.elapsed().as_millis(),
        size,
        parts.status.as_u16(),
        method,
        path
    );

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(StatusCode::CREATED), "36");
        assert_eq!(status_color(StatusCode::NOT_FOUND), "33");
        assert_eq!(status_color(StatusCode::INTERNAL_SERVER_ERROR), "31");
    }
}
