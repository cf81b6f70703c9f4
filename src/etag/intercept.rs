//! The interception pass shared by [`ETagMiddleware`](super::ETagMiddleware)
//! and [`ETagRoute`](super::ETagRoute).
//!
//! Per request: buffer the body, run the downstream handler once, negotiate,
//! then flush the buffer to the original sink (`200 OK`) or drop it (any
//! other final status, including a fresh `304`).
//!
//! A body that was already an in-memory buffer belongs to the caller and is
//! left as written, unless this pass revalidated it to `304`.

use tracing::{debug, error, trace, warn};

use super::negotiate::{Negotiator, Outcome};
use crate::context::Context;
use crate::error::PipelineError;
use crate::http::{Response, ResponseBody, StatusCode};

pub(crate) async fn intercept<F, Fut>(
    negotiator: &Negotiator,
    mut ctx: Context,
    downstream: F,
) -> Result<Context, PipelineError>
where
    F: FnOnce(Context) -> Fut,
    Fut: Future<Output = Result<Context, PipelineError>>,
{
    // An already-buffered body is reused rather than buffered twice.
    let original = if ctx.response().body().is_buffer() {
        trace!("response body already buffered; reusing it");
        None
    } else {
        Some(ctx.response_mut().replace_body(ResponseBody::buffer()))
    };

    // Errors and cancellation from downstream skip negotiation entirely.
    let mut ctx = downstream(ctx).await?;

    let (request, response) = ctx.parts_mut();
    let revalidated = match negotiator.negotiate(request, response) {
        Ok(outcome) => {
            debug!(path = %request.path(), ?outcome, "ETag negotiation finished");
            matches!(outcome, Outcome::NotModified(_))
        }
        Err(e) => {
            error!(
                path = %request.path(),
                error = %e,
                "ETag negotiation failed; sending the response untagged"
            );
            false
        }
    };

    finish(ctx.response_mut(), original, revalidated)?;
    Ok(ctx)
}

fn finish(
    response: &mut Response,
    original: Option<ResponseBody>,
    revalidated: bool,
) -> Result<(), PipelineError> {
    let flush = response.status() == StatusCode::Ok;

    let Some(original) = original else {
        if revalidated {
            trace!("clearing reused buffer for 304");
            response.body_mut().clear();
        }
        return Ok(());
    };

    match response.replace_body(original) {
        ResponseBody::Buffer(buffered) if flush => {
            trace!(bytes = buffered.len(), "flushing buffered body");
            let sink = response.body_mut();
            sink.write(&buffered)
                .and_then(|()| sink.flush())
                .map_err(|e| {
                    error!(error = %e, "failed to flush buffered body");
                    PipelineError::Flush(e)
                })
        }
        ResponseBody::Buffer(buffered) => {
            debug!(
                status = %response.status(),
                discarded = buffered.len(),
                "suppressing buffered body"
            );
            Ok(())
        }
        foreign @ ResponseBody::Stream(_) => {
            warn!("downstream handler replaced the output sink; keeping its sink");
            response.replace_body(foreign);
            Ok(())
        }
    }
}
