use actix_web::error::EitherExtractError;
use actix_web::http::header;
use actix_web::{post, web, Either, HttpMessage, HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{error_response, extract_error_response};
use crate::state::AppState;
use crate::types::{ErrorResponse, SummarizeRequest, SummarizeResponse};

type SummarizePayload = Either<web::Form<SummarizeRequest>, web::Json<SummarizeRequest>>;
type PayloadError = EitherExtractError<actix_web::Error, actix_web::Error>;

/// Pick the extractor failure that matches what the client sent.
///
/// `None` means the request carried no body at all.
fn payload_error(req: &HttpRequest, err: PayloadError) -> Option<actix_web::Error> {
    match err {
        EitherExtractError::Bytes(err) => Some(err),
        EitherExtractError::Extract(form_err, json_err) => {
            let headers = req.headers();
            let empty = headers
                .get(header::CONTENT_LENGTH)
                .map_or(true, |len| len.as_bytes() == b"0");
            if empty && !headers.contains_key(header::CONTENT_TYPE) {
                None
            } else if req.content_type().ends_with("json") {
                Some(json_err)
            } else {
                Some(form_err)
            }
        }
    }
}

/// POST /summarize - Hierarchical summary of the submitted text
///
/// Accepts `text` as a form field or in a JSON body.
#[post("/summarize")]
pub async fn summarize(
    req: HttpRequest,
    payload: Result<SummarizePayload, PayloadError>,
    state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    let text = match payload {
        Ok(Either::Left(form)) => form.into_inner().text,
        Ok(Either::Right(json)) => json.into_inner().text,
        Err(err) => match payload_error(&req, err) {
            Some(err) => {
                warn!("Rejected request body: {}", err);
                return extract_error_response(&err);
            }
            None => String::new(),
        },
    };

    let text = text.trim();
    if text.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("no text provided"));
    }

    match state.summarizer.summarize(text).await {
        Ok(outcome) => {
            info!(
                "Summary ready - {} chunk(s), {} chars",
                outcome.chunk_count,
                outcome.final_summary.chars().count()
            );
            HttpResponse::Ok().json(SummarizeResponse::from(outcome))
        }
        Err(e) => {
            error!("Summarization failed: {:?}", e);
            error_response(&e)
        }
    }
}
