#![allow(non_snake_case)]

use dioxus::prelude::*;

use super::types::{Message, Sender};
use super::widget::ChatWidget;

#[derive(PartialEq, Props)]
pub struct ContentProps {
    content: String,
    time: String,
}

pub fn UserMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "message user",
            div {
                class: "message-content",
                i { class: "fas fa-user" }
                div { class: "text", "{cx.props.content}" }
            }
            div { class: "timestamp", "{cx.props.time}" }
        }
    ))
}

pub fn BotMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "message bot",
            div {
                class: "message-content",
                i { class: "fas fa-robot" }
                div { class: "text", "{cx.props.content}" }
            }
            div { class: "timestamp", "{cx.props.time}" }
        }
    ))
}

#[derive(PartialEq, Props)]
pub struct TranscriptProps {
    messages: Vec<Message>,
    loading: bool,
}

/// The scrollable message list, with the placeholder while a reply is pending.
pub fn Transcript(cx: Scope<TranscriptProps>) -> Element {
    cx.render(rsx!(
        div {
            id: "chat-messages",
            class: "chat-messages",
            div {
                class: "transcript",
                for msg in cx.props.messages.iter() {
                    match msg.sender {
                        Sender::User => rsx!(UserMessage { content: msg.text.clone(), time: msg.time_label() }),
                        Sender::Bot => rsx!(BotMessage { content: msg.text.clone(), time: msg.time_label() }),
                    }
                }
                if cx.props.loading {
                    rsx!(Loading {})
                }
            }
        }
    ))
}

pub fn Loading(cx: Scope) -> Element {
    cx.render(rsx!(
        div {
            class: "message bot",
            div {
                class: "message-content",
                i { class: "fas fa-robot" }
                div {
                    class: "typing-indicator",
                    span {}
                    span {}
                    span {}
                }
            }
        }
    ))
}

#[derive(Props)]
pub struct InputProps<'a> {
    widget: &'a UseRef<ChatWidget>,
    on_press: EventHandler<'a, Event<KeyboardData>>,
}

pub fn UserInput<'a>(cx: Scope<'a, InputProps<'a>>) -> Element<'a> {
    let widget = cx.props.widget;
    let draft = widget.read().draft().to_string();

    cx.render(rsx!(input {
        id: "user-input",
        r#type: "text",
        placeholder: "Type your message here...",
        autocomplete: "off",
        autofocus: "true",
        value: "{draft}",
        oninput: move |e| widget.write().set_draft(e.value.clone()),
        onkeydown: move |e| cx.props.on_press.call(e),
    }))
}
