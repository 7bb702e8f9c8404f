//! Review command - analyze one snippet

use crate::aggregator::Engine;
use crate::config::AppConfig;
use crate::reporters::{self, OutputFormat};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub fn run(file: &Path, format: &str, output: Option<&Path>, capture_run: bool) -> Result<()> {
    let (code, filename) = read_input(file)?;

    let mut config = AppConfig::load(Path::new("."))?;
    if capture_run {
        config.analysis.capture_output = true;
    }

    let engine = Engine::new(&config);
    let review = engine.review(&code, &filename)?;

    let format: OutputFormat = format.parse()?;
    let rendered = reporters::render(&review, format)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote review to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn read_input(file: &Path) -> Result<(String, String)> {
    if file == Path::new("-") {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("failed to read stdin")?;
        return Ok((code, "snippet.py".to_string()));
    }

    let code = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "snippet.py".to_string());
    Ok((code, filename))
}
