use hydrogen_models::app::{App, AppResult};
use hydrogen_models::config::SimulationConfig;
use log::info;

fn main() -> AppResult<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            SimulationConfig::load_from_file(&path)?
        }
        None => SimulationConfig::default(),
    };

    let mut app = App::new(config)?;
    let summary = app.run();
    summary.log();
    Ok(())
}
