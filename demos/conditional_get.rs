//! Runs two requests through an ETag-enabled pipeline and prints the wire
//! image of each response.
//!
//! ```text
//! RUST_LOG=etagger=debug cargo run --example conditional_get
//! ```

use etagger::etag::{ETagOptions, ETagRoute, ValidatorStrength};
use etagger::handler::try_handler_fn;
use etagger::{Context, Pipeline, Request};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = ETagOptions::from_json(r#"{ "algorithm": "sha256" }"#)?;

    let article = ETagRoute::new()
        .validator(ValidatorStrength::Weak)
        .wrap(
            &options,
            try_handler_fn(|mut ctx| async move {
                let page = format!("<h1>Hello from {}</h1>", ctx.request().path());
                ctx.response_mut()
                    .set_header("Content-Type", "text/html; charset=utf-8");
                ctx.response_mut().write(page.as_bytes())?;
                Ok::<_, std::io::Error>(ctx)
            }),
        );

    let pipeline = Pipeline::builder()
        .use_etag_with(options)
        .endpoint(article)
        .build()?;

    let first = pipeline.execute(Context::new(Request::get("/article"))).await?;
    let etag = first
        .response()
        .headers()
        .get("ETag")
        .unwrap_or_default()
        .to_owned();
    print_response("first request", first);

    let second = pipeline
        .execute(Context::new(
            Request::get("/article").header("If-None-Match", etag),
        ))
        .await?;
    print_response("revalidation", second);

    Ok(())
}

fn print_response(label: &str, ctx: Context) {
    println!("── {label} ──");
    if let Some(bytes) = ctx.into_response().into_bytes() {
        println!("{}", String::from_utf8_lossy(&bytes));
    }
}
