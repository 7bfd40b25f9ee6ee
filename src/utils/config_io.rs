use anyhow::Context;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::{env, path::Path};

/// Get the command-line argument at position `pos`
pub fn take_from_args(pos: usize) -> Option<String> {
    env::args().nth(pos)
}

/// Load a config from a file, with `MINELIFT__`-prefixed environment
/// variables layered on top.
pub fn load_cfg<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let pb = path.as_ref().to_path_buf();
    if !pb.exists() {
        return Err(anyhow::anyhow!("file {} does not exist", pb.display()));
    }

    let cfg = Config::builder()
        .add_source(File::from(pb.clone()))
        .add_source(Environment::with_prefix("MINELIFT").separator("__"))
        .build()
        .with_context(|| format!("failed to read config from {}", pb.display()))?;

    let des: T = cfg
        .try_deserialize()
        .with_context(|| format!("failed to deserialize config from {}", pb.display()))?;

    Ok(des)
}
