use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;

use scrum_bot::conversation::{OpenAiBackend, Persona, Session, Surface};
use scrum_bot::utils::init_tracing;
use scrum_bot::{terminal, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the conversation
    init_tracing("warn", true);

    let config = Config::from_env()
        .context("Verifique se a variável GROQ_API_KEY está correta no seu arquivo .env")?;

    let backend = Arc::new(OpenAiBackend::new(&config.api_key, &config.api_base));
    let mut session = Session::new(backend, &Persona::scrum_master(Surface::Terminal))
        .with_params(config.params.clone())
        .with_history_limit(config.history_limit);
    println!("✅ Cliente configurado com sucesso!");

    let stdin = BufReader::new(tokio::io::stdin());
    terminal::run(&mut session, stdin, tokio::io::stdout(), config.kickoff).await
}
