use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Html,
    routing::get,
    Router,
};
use tracing::{debug, info};

use super::api;
use super::app::{app, AppProps};
use super::types::ChatLine;
use super::ServerState;
use crate::config::Config;
use crate::conversation::{
    OpenAiBackend, Persona, SessionRegistry, SessionTemplate, Surface,
};

fn page(reachable_addr: &str) -> String {
    format!(
        r#"
            <!DOCTYPE html>
            <html>
                <head>
                    <title>Chatbot Scrum Master</title>
                    <meta charset="utf-8">
                    <meta name="viewport"
                    content="width=device-width,
                    initial-scale=1,
                    minimum-scale=1,
                    maximum-scale=1,
                    user-scalable=no">
                </head>
                <body> <div id="main"></div> </body>
                {glue}
            </html>
            "#,
        glue = dioxus_liveview::interpreter_glue(&format!("ws://{reachable_addr}/ws"))
    )
}

/// Chat page, liveview socket and the JSON session API.
pub fn router(state: Arc<ServerState>) -> Router {
    let view = dioxus_liveview::LiveViewPool::new();

    Router::new()
        .route(
            "/",
            get(|State(state): State<Arc<ServerState>>| async move {
                Html(page(&state.reachable_addr))
            }),
        )
        .route(
            "/ws",
            get(
                move |ws: WebSocketUpgrade, State(state): State<Arc<ServerState>>| async move {
                    ws.on_upgrade(move |socket| async move {
                        // one session per socket, dropped when the socket goes away
                        let Some(session) = state.registry.open() else {
                            return;
                        };
                        let id = session.id();
                        let initial: Vec<ChatLine> = session
                            .display_transcript()
                            .iter()
                            .map(ChatLine::from)
                            .collect();
                        let props = AppProps { session, initial };
                        _ = view
                            .launch_with_props(dioxus_liveview::axum_socket(socket), app, props)
                            .await;
                        debug!(session = %id, "liveview socket ended");
                        state.registry.close(&id);
                    })
                },
            ),
        )
        .merge(api::routes())
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<()> {
    let backend = Arc::new(OpenAiBackend::new(&config.api_key, &config.api_base));
    let mut template = SessionTemplate::new(backend, Persona::scrum_master(Surface::Web));
    template.params = config.params.clone();
    template.history_limit = config.history_limit;

    let state = Arc::new(ServerState {
        registry: SessionRegistry::with_max_sessions(template, config.max_sessions),
        reachable_addr: config.reachable_addr.clone(),
    });
    let app = router(state);

    info!("Listening on http://{}", config.listen_addr);

    axum::Server::bind(&config.listen_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await?;
    Ok(())
}
