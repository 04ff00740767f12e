use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::Error;
use std::time::Instant;

const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Log each request on entry and exit and report its duration in `X-Process-Time`
pub async fn log_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();
    let path = req.path().to_string();
    let start = Instant::now();
    tracing::info!("→ {} {}", method, path);

    let mut res = next.call(req).await?;

    let duration = start.elapsed().as_secs_f64();
    tracing::info!(
        "← {} {} - {} - {:.3}s",
        method,
        path,
        res.status().as_u16(),
        duration
    );
    if let Ok(value) = HeaderValue::from_str(&format!("{duration:.6}")) {
        res.headers_mut()
            .insert(HeaderName::from_static(PROCESS_TIME_HEADER), value);
    }

    Ok(res)
}
