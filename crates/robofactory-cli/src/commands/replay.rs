//! Replay a script of actions against a fresh world.
//!
//! Scripts hold one `agent: action(args...)` per line. Blank lines and
//! lines starting with `#` are skipped.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use robofactory::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;

use crate::commands::build_simulation;
use crate::config::Config;
use crate::render;

/// One script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub agent: String,
    pub call: ActionCall,
}

/// Parse a script line. `Ok(None)` for blanks and comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptLine>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (agent, literal) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("expected `agent: action(...)`"))?;
    let agent = agent.trim();
    if agent.is_empty() {
        return Err(anyhow!("missing agent name"));
    }
    let call: ActionCall = literal.trim().parse()?;
    Ok(Some(ScriptLine {
        agent: agent.to_string(),
        call,
    }))
}

pub fn run(file: &Path, events: Option<&Path>, seed: Option<u64>) -> Result<()> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read script: {}", file.display()))?;

    let config = Config::load()?;
    let mut sim = build_simulation(&config, seed)?;
    let recorder = EventRecorder::new();
    sim.subscribe(Box::new(recorder.clone()));

    println!("{} Replaying {}...", "→".blue(), file.display());

    let mut agents = BTreeSet::new();
    let (mut accepted, mut rejected) = (0usize, 0usize);
    for (idx, raw) in script.lines().enumerate() {
        let line_no = idx + 1;
        let parsed = parse_line(raw).with_context(|| format!("{}:{}", file.display(), line_no))?;
        let Some(ScriptLine { agent, call }) = parsed else {
            continue;
        };
        if sim.dispatch_call(&agent, &call) {
            accepted += 1;
            println!("  {} {:>3} {}: {}", "✓".green(), line_no, agent.cyan(), call);
        } else {
            rejected += 1;
            println!("  {} {:>3} {}: {}", "✗".red(), line_no, agent.cyan(), call);
        }
        agents.insert(agent);
    }

    println!();
    render::print_world(&sim.snapshot());
    println!();
    println!("{} Percepts", "→".blue());
    for agent in &agents {
        let percepts: Vec<String> = sim.percepts(agent).iter().map(|p| p.to_string()).collect();
        println!("  {}: {}", agent.cyan(), percepts.join(", "));
    }

    if let Some(path) = events {
        let recorded = recorder.events();
        let json = serde_json::to_string_pretty(&recorded).context("Failed to serialize events")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write events: {}", path.display()))?;
        println!();
        println!(
            "  {} Wrote {} events to {}",
            "✓".green(),
            recorded.len(),
            path.display()
        );
    }

    println!();
    println!(
        "{} {} accepted, {} rejected",
        "✓".green().bold(),
        accepted.to_string().green(),
        rejected.to_string().red()
    );
    Ok(())
}
