use scrum_bot::utils::init_tracing;
use scrum_bot::Config;

fn main() -> anyhow::Result<()> {
    init_tracing("info", false);

    let config = Config::from_env()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(scrum_bot::start_server(config))
}
