use minelift::config::SimConfig;
use minelift::prelude::*;
use minelift::utils::config_io;

/// Runs the mine simulation until a termination signal arrives.
///
/// Pass a config file path as the first argument, otherwise defaults are
/// used; `MINELIFT__`-prefixed environment variables override file values.
fn main() -> anyhow::Result<()> {
    let logger = LoggerConfig::from_env();
    let _log_guard = logger.init()?;

    let cfg: SimConfig = match config_io::take_from_args(1) {
        Some(path) => config_io::load_cfg(&path)?,
        None => SimConfig::default(),
    };
    tracing::info!("starting with config: {:?}", cfg);

    let rt = MineRuntime::spawn(cfg)?;
    rt.run_until_signalled()
}
