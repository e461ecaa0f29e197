use dioxus::html::input_data::keyboard_types::Key;
use dioxus::prelude::*;
use tracing::warn;

use super::components::*;
use super::types::*;
use crate::conversation::SessionHandle;

/// Root props for one browser connection.
pub struct AppProps {
    pub session: SessionHandle,
    pub initial: Vec<ChatLine>,
}

pub fn app(cx: Scope<AppProps>) -> Element {
    let draft = use_ref(cx, String::new);
    let lines = use_ref(cx, || cx.props.initial.clone());
    let loading = use_state(cx, || false);

    let send = move |_: ()| {
        if **loading {
            return;
        }
        let text = draft.read().trim().to_string();
        if text.is_empty() {
            return;
        }
        loading.set(true);
        draft.set(String::new());
        lines.write().push(ChatLine::user(text.clone()));

        cx.spawn({
            to_owned![loading, lines];
            let session = cx.props.session.clone();

            async move {
                let line = match session.submit(&text).await {
                    Ok(reply) => ChatLine::assistant(reply),
                    Err(err) => {
                        warn!(session = %session.id(), error = %err, "turn failed");
                        ChatLine::error(err.user_message())
                    }
                };
                lines.write().push(line);
                loading.set(false);
            }
        })
    };

    let send_enter = move |e: Event<KeyboardData>| {
        if let Key::Enter = e.data.key() {
            send(());
        }
    };

    let send_button = move |_| {
        send(());
    };

    cx.render(rsx!(
        style { include_str!("./style.css") }
        div {
            id: "header",
            h1 {"🤖 Chatbot Scrum Master"}
            h2 {"Um assistente de IA para ajudar seu time ágil, powered by Groq"}
        }
        div {
            id: "chat-window",
            class: "chat-window",
            for line in lines.read().iter() {
                match line.kind {
                    LineKind::User => rsx!(UserMessage { content: line.content.clone() }),
                    LineKind::Assistant => rsx!(AssistantMessage { content: line.content.clone() }),
                    LineKind::Error => rsx!(ErrorMessage { content: line.content.clone() }),
                }
            }
            if **loading {
                rsx!(Loading {})
            }
        }
        div {
            id: "input-area",
            input {
                id: "user-input",
                placeholder: "Digite sua mensagem aqui...",
                value: "{draft.read()}",
                oninput: move |evt| draft.set(evt.value.clone()),
                onkeydown: send_enter,
            }
            button {
                id: "send-button",
                onclick: send_button, "Enviar" }
        }
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::conversation::{
        Persona, ScriptedBackend, SessionRegistry, SessionTemplate, Surface,
    };

    fn open_session() -> SessionHandle {
        let template = SessionTemplate::new(
            Arc::new(ScriptedBackend::new()),
            Persona::scrum_master(Surface::Web),
        );
        SessionRegistry::new(template).open().unwrap()
    }

    fn render(session: SessionHandle, initial: Vec<ChatLine>) -> String {
        let mut dom = VirtualDom::new_with_props(app, AppProps { session, initial });
        let _ = dom.rebuild();
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn test_first_paint_shows_greeting_without_system_text() {
        let session = open_session();
        let initial = session
            .display_transcript()
            .iter()
            .map(ChatLine::from)
            .collect();
        let html = render(session, initial);

        assert!(html.contains("Chatbot Scrum Master"));
        assert!(html.contains("assistant-message"));
        assert!(html.contains("Daily Stand-up"));
        assert!(!html.contains("Suas principais responsabilidades"));
        assert!(!html.contains("Pensando..."));
        assert!(html.contains("user-input"));
    }

    #[test]
    fn test_each_line_kind_has_its_own_style() {
        let html = render(
            open_session(),
            vec![
                ChatLine::assistant("Olá!".into()),
                ChatLine::user("ontem fechei o PR".into()),
                ChatLine::error("❌ Ocorreu um erro ao chamar a API: offline".into()),
            ],
        );
        assert!(html.contains("assistant-message"));
        assert!(html.contains("user-message"));
        assert!(html.contains("error-message"));
        assert!(html.contains("offline"));
    }
}
