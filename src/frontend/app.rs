use std::sync::Arc;

use dioxus::prelude::*;

use super::components::*;
use super::transport::ChatBackend;
use super::widget::ChatWidget;

/// Root props handed to every LiveView session.
pub struct AppProps {
    pub backend: Arc<dyn ChatBackend>,
}

pub fn app(cx: Scope<AppProps>) -> Element {
    let widget = use_ref(cx, ChatWidget::new);

    let dispatch = move |outgoing: Option<String>| {
        let Some(message) = outgoing else {
            return;
        };
        widget.needs_update();

        cx.spawn({
            to_owned![widget];
            let backend = cx.props.backend.clone();

            async move {
                let reply = backend.send(&message).await;
                widget.write().finish(reply);
            }
        });
    };

    let send_enter = move |e: Event<KeyboardData>| {
        let outgoing = widget
            .write_silent()
            .on_key(&e.data.key(), e.data.modifiers());
        dispatch(outgoing);
    };

    let send_form = move |_: Event<FormData>| {
        let outgoing = widget.write_silent().on_form_submit();
        dispatch(outgoing);
    };

    cx.render(rsx!(
        style { include_str!("./style.css") }
        div {
            id: "header",
            h1 {"Medical Chatbot"}
            h2 {"Ask a health question"}
        }
        Transcript {
            messages: widget.read().messages().to_vec(),
            loading: widget.read().is_loading(),
        }
        form {
            id: "chat-form",
            prevent_default: "onsubmit",
            onsubmit: send_form,
            UserInput {
                widget: widget,
                on_press: send_enter,
            }
            button {
                id: "send-button",
                r#type: "submit",
                "Send"
            }
        }
    ))
}
