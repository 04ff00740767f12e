use actix_web::{web, HttpResponse, Result};
use letter_layout::{audit_layout, markup_to_plain_text, normalize_with_outcome};
use shared_types::{NormalizeLetterRequest, NormalizeLetterResponse};

/// Re-apply the canonical layout to an edited letter
pub async fn normalize_letter(request: web::Json<NormalizeLetterRequest>) -> Result<HttpResponse> {
    let req = request.into_inner();

    let normalization = normalize_with_outcome(&req.letter);
    let audit = audit_layout(&normalization.markup);
    let layout = normalization.report(&audit);

    Ok(HttpResponse::Ok().json(NormalizeLetterResponse {
        plain_text: markup_to_plain_text(&normalization.markup),
        letter: normalization.markup,
        layout,
    }))
}
