use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{ws::WebSocketUpgrade, Form, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use dioxus_liveview::LiveViewPool;
use serde::Deserialize;

use crate::assistant::{screen_answer, Assistant, Bot, ERROR_REPLY};
use crate::config::Config;
use crate::frontend::{app, AppProps, ChatBackend, HttpBackend};
use crate::retrieval::{load_pdfs, split_pages, MemoryStore, OpenAiEmbedder, Retriever};

#[derive(Deserialize)]
pub struct ChatForm {
    pub msg: String,
}

/// `POST /get`: one form field in, plain text out.
pub fn chat_routes(assistant: Arc<dyn Assistant>) -> Router {
    Router::new()
        .route("/get", post(reply))
        .with_state(assistant)
}

async fn reply(
    State(assistant): State<Arc<dyn Assistant>>,
    Form(form): Form<ChatForm>,
) -> String {
    match assistant.answer(&form.msg).await {
        Ok(answer) => screen_answer(&answer),
        Err(err) => {
            tracing::error!("failed to answer: {err:#}");
            ERROR_REPLY.to_string()
        }
    }
}

#[derive(Clone)]
struct LiveState {
    view: Arc<LiveViewPool>,
    backend: Arc<dyn ChatBackend>,
    ws_url: String,
}

/// The widget page and its websocket. Every connection gets its own widget.
pub fn widget_routes(backend: Arc<dyn ChatBackend>, reachable_addr: &str) -> Router {
    let state = LiveState {
        view: Arc::new(LiveViewPool::new()),
        backend,
        ws_url: format!("ws://{reachable_addr}/ws"),
    };

    Router::new()
        .route("/", get(index))
        .route("/ws", get(socket))
        .with_state(state)
}

async fn index(State(state): State<LiveState>) -> Html<String> {
    Html(format!(
        r#"
    <!DOCTYPE html>
    <html>
        <head>
            <title>Medical Chatbot</title>
            <meta name="viewport"
            content="width=device-width,
            initial-scale=1,
            minimum-scale=1,
            maximum-scale=1,
            user-scalable=no">
            <link rel="stylesheet"
            href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
        </head>
        <body> <div id="main"></div> </body>
        {glue}
    </html>
    "#,
        glue = dioxus_liveview::interpreter_glue(&state.ws_url)
    ))
}

async fn socket(ws: WebSocketUpgrade, State(state): State<LiveState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let props = AppProps {
            backend: state.backend.clone(),
        };
        if let Err(err) = state
            .view
            .launch_with_props(dioxus_liveview::axum_socket(socket), app, props)
            .await
        {
            tracing::warn!(?err, "liveview session ended with an error");
        }
    })
}

pub fn router(config: &Config, assistant: Arc<dyn Assistant>) -> Router {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(&config.chat_endpoint));

    widget_routes(backend, &config.reachable_addr).merge(chat_routes(assistant))
}

/// Loads and embeds the PDF library. Refuses to start without documents.
pub async fn build_retriever(config: &Config) -> Result<Retriever> {
    let retrieval = &config.retrieval;
    let retriever = Retriever::new(
        Arc::new(OpenAiEmbedder::new(&config.llm, &retrieval.embedding_model)),
        Arc::new(MemoryStore::new()),
        retrieval.top_k,
    );

    let pages = load_pdfs(&retrieval.data_dir)
        .await
        .context("Add medical PDFs to the data directory")?;
    let chunks = split_pages(&pages)?;
    let stored = retriever.ingest(chunks).await?;
    tracing::info!(chunks = stored, "Vector store ready");

    Ok(retriever)
}

pub async fn start_server(config: Config) -> Result<()> {
    let retriever = build_retriever(&config).await?;
    let assistant: Arc<dyn Assistant> = Arc::new(Bot::new(&config.llm, retriever));
    let app = router(&config, assistant);

    tracing::info!(
        model = %config.llm.model,
        endpoint = %config.chat_endpoint,
        "Listening on http://{}",
        config.listen_addr
    );

    axum::Server::try_bind(&config.listen_addr)
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?
        .serve(app.into_make_service())
        .await
        .context("Server error")
}
