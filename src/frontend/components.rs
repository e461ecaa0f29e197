#![allow(non_snake_case)]

use dioxus::prelude::*;

use super::markdown;

#[derive(PartialEq, Props)]
pub struct ContentProps {
    content: String,
}

pub fn UserMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-message user-message",
            "{cx.props.content}"
        }
    ))
}

pub fn AssistantMessage(cx: Scope<ContentProps>) -> Element {
    let html = markdown::to_html(&cx.props.content);
    cx.render(rsx!(
        div {
            class: "chat-message assistant-message",
            dangerous_inner_html: "{html}",
        }
    ))
}

pub fn ErrorMessage(cx: Scope<ContentProps>) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-message error-message",
            "{cx.props.content}"
        }
    ))
}

pub fn Loading(cx: Scope) -> Element {
    cx.render(rsx!(
        div {
            class: "chat-message assistant-message",
            div {
                class: "spinner",
            }
            span {
                class: "spinner-label",
                "Pensando..."
            }
        }
    ))
}
