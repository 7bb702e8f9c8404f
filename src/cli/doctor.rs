//! Doctor command - check environment

use crate::analyzers::{is_python_tool_installed, is_tool_installed};
use anyhow::Result;

pub fn run() -> Result<()> {
    println!("Critique Doctor\n");

    let mut missing = false;
    for tool in ["python", "ruff", "bandit", "radon"] {
        if is_tool_installed(tool) || is_python_tool_installed(tool) {
            println!("✓ {tool}: installed");
        } else {
            println!("○ {tool}: not found (its findings will report as unavailable)");
            missing = true;
        }
    }

    // AI providers are all optional - BYOK
    let has_openai = std::env::var("OPENAI_API_KEY").is_ok();
    let has_anthropic = std::env::var("ANTHROPIC_API_KEY").is_ok();

    println!();
    if has_openai || has_anthropic {
        let mut providers = Vec::new();
        if has_openai {
            providers.push("OpenAI");
        }
        if has_anthropic {
            providers.push("Anthropic");
        }
        println!("✓ Remote AI providers: {}", providers.join(", "));
    } else {
        println!("○ Remote AI providers: none configured");
        println!("  Set OPENAI_API_KEY or ANTHROPIC_API_KEY to enable remote fallback");
    }
    println!("○ Local AI: Ollama is used when reachable at localhost:11434");

    if missing {
        println!("\nSome analysis tools are missing; reviews still succeed with partial coverage.");
    } else {
        println!("\nAll checks passed.");
    }
    Ok(())
}
