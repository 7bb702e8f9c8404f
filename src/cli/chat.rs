//! Chat command - one round through the provider bridge

use crate::ai::Bridge;
use crate::config::AppConfig;
use crate::models::Turn;
use anyhow::{bail, Context, Result};
use std::io::Read;
use std::path::Path;

pub fn run(message: &str, from_stdin: bool) -> Result<()> {
    let turns = if from_stdin {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        serde_json::from_str::<Vec<Turn>>(&raw).context("stdin is not a JSON conversation")?
    } else {
        if message.trim().is_empty() {
            bail!("no message provided");
        }
        vec![Turn::user(message)]
    };

    let config = AppConfig::load(Path::new("."))?;
    let bridge = Bridge::new(config.providers);
    let reply = bridge.respond(&turns);

    println!("{}", reply.content);
    Ok(())
}
