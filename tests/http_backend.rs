use std::net::SocketAddr;

use axum::{
    extract::Form,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};

use medichat::frontend::{ChatBackend, ChatWidget, HttpBackend, Sender, FALLBACK_REPLY};
use medichat::server::ChatForm;

async fn spawn_server(app: Router) -> SocketAddr {
    let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    addr
}

/// Echoes the decoded `msg` field and the request content type.
async fn echo(headers: HeaderMap, Form(form): Form<ChatForm>) -> String {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    format!("{content_type}|{}", form.msg)
}

async fn hello() -> &'static str {
    "Hello!"
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

fn endpoint(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

#[tokio::test]
async fn posts_url_encoded_form() {
    let addr = spawn_server(Router::new().route("/get", post(echo))).await;
    let backend = HttpBackend::new(endpoint(addr, "/get"));

    let reply = backend.send("fever & chills = flu? 100%").await.unwrap();

    assert_eq!(
        reply,
        "application/x-www-form-urlencoded|fever & chills = flu? 100%"
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let addr = spawn_server(Router::new().route("/get", post(broken))).await;
    let backend = HttpBackend::new(endpoint(addr, "/get"));

    assert!(backend.send("hi").await.is_err());
}

#[tokio::test]
async fn widget_renders_server_reply() {
    let addr = spawn_server(Router::new().route("/get", post(hello))).await;
    let backend = HttpBackend::new(endpoint(addr, "/get"));
    let mut widget = ChatWidget::new();
    widget.set_draft("hi there".into());

    assert!(widget.submit(&backend).await);

    let messages = widget.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "hi there");
    assert_eq!(messages[1].sender, Sender::Bot);
    assert_eq!(messages[1].text, "Hello!");
    assert!(!widget.is_loading());
}

#[tokio::test]
async fn widget_apologises_on_server_error() {
    let addr = spawn_server(Router::new().route("/get", post(broken))).await;
    let backend = HttpBackend::new(endpoint(addr, "/get"));
    let mut widget = ChatWidget::new();
    widget.set_draft("hi".into());

    widget.submit(&backend).await;

    assert_eq!(widget.messages().len(), 2);
    assert_eq!(widget.messages()[1].text, FALLBACK_REPLY);
    assert_eq!(widget.draft(), "");
}

#[tokio::test]
async fn widget_apologises_when_server_is_unreachable() {
    let addr = spawn_server(Router::new().route("/get", post(hello))).await;
    // Right host, wrong path: 404 takes the same route as a dead socket.
    let missing = HttpBackend::new(endpoint(addr, "/missing"));
    let unreachable = HttpBackend::new("http://127.0.0.1:1/get");

    for backend in [&missing, &unreachable] {
        let mut widget = ChatWidget::new();
        widget.set_draft("hi".into());
        widget.submit(backend).await;

        assert_eq!(widget.messages().len(), 2);
        assert_eq!(widget.messages()[1].sender, Sender::Bot);
        assert_eq!(widget.messages()[1].text, FALLBACK_REPLY);
    }
}
