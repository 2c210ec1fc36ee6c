//! The one-field web form.
//!
//! `GET /` shows an empty form, `POST /` runs the agent on the submitted URL
//! and shows the same form with the result filled in.
use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use threadcast_agent::ThreadAgent;
use threadcast_common::ThreadcastError;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub const PAGE_TITLE: &str = "🧠 AI Article-to-Tweet Thread Agent";
const INPUT_LABEL: &str = "Paste article URL here";
const OUTPUT_LABEL: &str = "Tweet Thread Preview";
const OUTPUT_LINES: usize = 20;

#[derive(Debug, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub url: String,
}

pub fn router(agent: Arc<ThreadAgent>) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit))
        .route("/healthz", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(agent)
}

/// Bind `addr` and serve `app` until `shutdown` resolves.
pub async fn serve<F>(addr: &str, app: Router, shutdown: F) -> threadcast_common::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ThreadcastError::Server(format!("binding {addr}: {e}")))?;
    tracing::info!(%addr, "server.listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ThreadcastError::Server(format!("serving {addr}: {e}")))
}

async fn show_form() -> Html<String> {
    Html(render_page("", ""))
}

async fn submit(State(agent): State<Arc<ThreadAgent>>, Form(form): Form<Submission>) -> Html<String> {
    tracing::info!(url = %form.url, "form.submitted");
    let output = agent.run_agent(&form.url).await;
    Html(render_page(&form.url, &output))
}

pub fn render_page(url: &str, output: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}
label {{ display: block; font-weight: bold; margin-top: 1rem; }}
input, textarea {{ width: 100%; box-sizing: border-box; }}
</style>
</head>
<body>
<h1>{title}</h1>
<form method="post" action="/">
<label for="url">{input_label}</label>
<input id="url" name="url" type="text" value="{url}">
<button type="submit">Submit</button>
</form>
<label for="output">{output_label}</label>
<textarea id="output" rows="{rows}" readonly>{output}</textarea>
</body>
</html>
"#,
        title = PAGE_TITLE,
        input_label = INPUT_LABEL,
        output_label = OUTPUT_LABEL,
        rows = OUTPUT_LINES,
        url = escape_html(url),
        output = escape_html(output),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
