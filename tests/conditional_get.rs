//! End-to-end behavior of both ETag interceptors against a capturing sink.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use etagger::etag::{
    DEFAULT_MAX_BODY_LENGTH, EMPTY_BODY_DIGEST, ETagOptions, ETagRoute, HashAlgorithm,
    ValidatorStrength, compute_etag,
};
use etagger::handler::{Handler, handler_fn, try_handler_fn};
use etagger::{Context, Method, Pipeline, PipelineError, Request, StatusCode};

/// A host sink that records everything flushed to it.
#[derive(Clone, Default)]
struct Wire(Arc<Mutex<Vec<u8>>>);

impl Wire {
    fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for Wire {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn respond_with(status: StatusCode, body: &'static [u8]) -> Handler {
    handler_fn(move |mut ctx| async move {
        ctx.response_mut().set_status(status);
        ctx.response_mut().write(body).unwrap();
        ctx
    })
}

fn etag_pipeline(options: ETagOptions, endpoint: Handler) -> Pipeline {
    Pipeline::builder()
        .use_etag_with(options)
        .endpoint(endpoint)
        .build()
        .unwrap()
}

async fn send(pipeline: &Pipeline, request: Request) -> (Context, Vec<u8>) {
    let wire = Wire::default();
    let ctx = pipeline
        .execute(Context::with_sink(request, wire.clone()))
        .await
        .unwrap();
    (ctx, wire.bytes())
}

#[tokio::test]
async fn matching_validator_returns_304_with_empty_body() {
    let pipeline = etag_pipeline(
        ETagOptions::default(),
        respond_with(StatusCode::Ok, b"<h1>hello</h1>"),
    );

    let (first, first_wire) = send(&pipeline, Request::get("/")).await;
    assert_eq!(first.response().status(), StatusCode::Ok);
    assert_eq!(first_wire, b"<h1>hello</h1>");
    let tag = first.response().headers().get("etag").unwrap().to_owned();

    let (second, second_wire) = send(
        &pipeline,
        Request::get("/").header("If-None-Match", tag.clone()),
    )
    .await;
    assert_eq!(second.response().status(), StatusCode::NotModified);
    assert_eq!(second.response().headers().get("etag"), Some(tag.as_str()));
    assert!(second_wire.is_empty());
}

#[tokio::test]
async fn mismatching_validator_passes_body_through() {
    let pipeline = etag_pipeline(
        ETagOptions::default(),
        respond_with(StatusCode::Ok, b"fresh"),
    );

    let (ctx, wire) = send(
        &pipeline,
        Request::get("/").header("If-None-Match", "\"zzz999\""),
    )
    .await;

    assert_eq!(ctx.response().status(), StatusCode::Ok);
    assert_eq!(wire, b"fresh");
    let expected = compute_etag(b"fresh", &ETagOptions::default()).to_string();
    assert_eq!(ctx.response().headers().get("etag"), Some(expected.as_str()));
}

#[tokio::test]
async fn downstream_404_is_untouched_and_unflushed() {
    let pipeline = etag_pipeline(
        ETagOptions::default(),
        respond_with(StatusCode::NotFound, b"no such page"),
    );

    let (ctx, wire) = send(&pipeline, Request::get("/missing").header("If-None-Match", "*")).await;

    assert_eq!(ctx.response().status(), StatusCode::NotFound);
    assert!(!ctx.response().headers().contains("etag"));
    assert!(wire.is_empty());
}

#[tokio::test]
async fn in_memory_404_body_is_kept() {
    let pipeline = etag_pipeline(
        ETagOptions::default(),
        respond_with(StatusCode::NotFound, b"no such page"),
    );

    let ctx = pipeline
        .execute(Context::new(Request::get("/missing")))
        .await
        .unwrap();

    assert_eq!(ctx.response().status(), StatusCode::NotFound);
    assert_eq!(ctx.response().body().as_bytes(), Some(&b"no such page"[..]));
    let wire = ctx.into_response().into_bytes().unwrap();
    assert!(wire.ends_with(b"\r\n\r\nno such page"));
}

#[tokio::test]
async fn handler_error_reaches_the_host() {
    let endpoint = try_handler_fn(|_ctx| async move {
        Err::<Context, _>(io::Error::other("backend down"))
    });
    let pipeline = etag_pipeline(ETagOptions::default(), endpoint);
    let wire = Wire::default();

    let result = pipeline
        .execute(Context::with_sink(Request::get("/"), wire.clone()))
        .await;

    assert!(matches!(result, Err(PipelineError::Handler(_))));
    assert!(wire.bytes().is_empty());
}

#[tokio::test]
async fn post_is_flushed_without_etag() {
    let pipeline = etag_pipeline(
        ETagOptions::default(),
        respond_with(StatusCode::Ok, b"accepted"),
    );

    let (ctx, wire) = send(&pipeline, Request::new(Method::Post, "/items")).await;

    assert!(!ctx.response().headers().contains("etag"));
    assert_eq!(wire, b"accepted");
}

#[tokio::test]
async fn size_threshold_is_inclusive() {
    let options = ETagOptions::new(HashAlgorithm::Sha1, ValidatorStrength::Strong, 8);

    let at_limit = etag_pipeline(options.clone(), respond_with(StatusCode::Ok, b"12345678"));
    let (ctx, _) = send(&at_limit, Request::get("/")).await;
    assert!(ctx.response().headers().contains("etag"));

    let over_limit = etag_pipeline(options, respond_with(StatusCode::Ok, b"123456789"));
    let (ctx, wire) = send(&over_limit, Request::get("/")).await;
    assert!(!ctx.response().headers().contains("etag"));
    assert_eq!(wire, b"123456789");
}

#[tokio::test]
async fn zero_threshold_means_default() {
    let options = ETagOptions::new(HashAlgorithm::Sha1, ValidatorStrength::Strong, 0);
    assert_eq!(options.max_body_length(), DEFAULT_MAX_BODY_LENGTH);

    let body: &'static [u8] = Box::leak(vec![b'x'; DEFAULT_MAX_BODY_LENGTH].into_boxed_slice());
    let pipeline = etag_pipeline(options, respond_with(StatusCode::Ok, body));
    let (ctx, wire) = send(&pipeline, Request::get("/")).await;
    assert!(ctx.response().headers().contains("etag"));
    assert_eq!(wire.len(), DEFAULT_MAX_BODY_LENGTH);
}

#[tokio::test]
async fn empty_body_gets_weak_sentinel() {
    let options = ETagOptions::new(HashAlgorithm::Md5, ValidatorStrength::Weak, 0);
    let pipeline = etag_pipeline(options, respond_with(StatusCode::Ok, b""));

    let (ctx, _) = send(&pipeline, Request::get("/")).await;

    let expected = format!("W/\"{EMPTY_BODY_DIGEST}\"");
    assert_eq!(ctx.response().headers().get("etag"), Some(expected.as_str()));
}

#[tokio::test]
async fn upstream_etag_is_preserved() {
    let endpoint = handler_fn(|mut ctx| async move {
        ctx.response_mut().set_header("ETag", "\"v42\"");
        ctx.response_mut().write(b"versioned").unwrap();
        ctx
    });
    let pipeline = etag_pipeline(ETagOptions::default(), endpoint);

    let (ctx, wire) = send(&pipeline, Request::get("/").header("If-None-Match", "\"v42\"")).await;

    assert_eq!(ctx.response().status(), StatusCode::Ok);
    assert_eq!(ctx.response().headers().get("etag"), Some("\"v42\""));
    assert_eq!(wire, b"versioned");
}

#[tokio::test]
async fn nested_interceptors_tag_once() {
    let global = ETagOptions::default();
    let endpoint = ETagRoute::new()
        .validator(ValidatorStrength::Weak)
        .wrap(&global, respond_with(StatusCode::Ok, b"nested"));
    let pipeline = etag_pipeline(global, endpoint);

    let (ctx, wire) = send(&pipeline, Request::get("/")).await;

    let tags: Vec<_> = ctx.response().headers().get_all("etag").collect();
    assert_eq!(tags.len(), 1);
    assert!(tags[0].starts_with("W/"));
    assert_eq!(wire, b"nested");
}

#[tokio::test]
async fn nested_interceptors_revalidate_to_empty_body() {
    let global = ETagOptions::default();
    let endpoint = ETagRoute::new().wrap(&global, respond_with(StatusCode::Ok, b"nested"));
    let pipeline = etag_pipeline(global.clone(), endpoint);
    let tag = compute_etag(b"nested", &global).to_string();

    let (ctx, wire) = send(&pipeline, Request::get("/").header("If-None-Match", tag)).await;

    assert_eq!(ctx.response().status(), StatusCode::NotModified);
    assert!(wire.is_empty());
}

#[tokio::test]
async fn cancelled_downstream_never_reaches_the_sink() {
    let endpoint = handler_fn(|mut ctx| async move {
        ctx.response_mut().write(b"partial").unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        ctx
    });
    let pipeline = etag_pipeline(ETagOptions::default(), endpoint);
    let wire = Wire::default();

    let result = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        pipeline.execute(Context::with_sink(Request::get("/"), wire.clone())),
    )
    .await;

    assert!(result.is_err());
    assert!(wire.bytes().is_empty());
}

#[tokio::test]
async fn options_from_json_drive_the_pipeline() {
    let options = ETagOptions::from_json(r#"{ "algorithm": "sha384", "validator": "weak" }"#).unwrap();
    let pipeline = etag_pipeline(options.clone(), respond_with(StatusCode::Ok, b"json"));

    let (ctx, _) = send(&pipeline, Request::get("/")).await;

    let expected = compute_etag(b"json", &options).to_string();
    assert!(expected.starts_with("W/"));
    assert_eq!(ctx.response().headers().get("etag"), Some(expected.as_str()));
}

#[tokio::test]
async fn serialized_304_has_no_body() {
    let pipeline = etag_pipeline(
        ETagOptions::default(),
        respond_with(StatusCode::Ok, b"cached"),
    );
    let tag = compute_etag(b"cached", &ETagOptions::default()).to_string();

    let ctx = pipeline
        .execute(Context::new(Request::get("/").header("If-None-Match", tag)))
        .await
        .unwrap();

    let wire = ctx.into_response().into_bytes().unwrap();
    let text = String::from_utf8(wire.to_vec()).unwrap();
    assert!(text.starts_with("HTTP/1.1 304 Not Modified\r\n"));
    assert!(text.contains("Content-Length: 0\r\n"));
    assert!(text.ends_with("\r\n\r\n"));
}
