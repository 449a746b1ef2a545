//! pack-tools: print the tools a pack prompt would see.
//!
//! # Environment Variables
//!
//! - `PACK_AGENT_BASE_URL`: base URL for every agent member
//! - `PACK_AGENT_ENDPOINT_<MEMBER>`: per-member base URL
//! - `RUST_LOG`: log filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin pack_tools -- pack.yaml orchestrator
//! cargo run --bin pack_tools -- pack.json orchestrator --config routing.yaml --state review
//! cargo run --bin pack_tools -- pack.json --cards
//! ```

use anyhow::{bail, Context, Result};

use pack_capabilities::a2a::generate_agent_cards;
use pack_capabilities::config::RoutingConfig;
use pack_capabilities::pack::Pack;
use pack_capabilities::session::ToolSetup;

const USAGE: &str =
    "usage: pack_tools <pack-file> (<prompt> [--config <file>] [--state <name>] | --cards)";

struct Args {
    pack_path: String,
    prompt: Option<String>,
    config_path: Option<String>,
    state: Option<String>,
    cards: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let pack_path = args.next().context(USAGE)?;
    let mut parsed = Args {
        pack_path,
        prompt: None,
        config_path: None,
        state: None,
        cards: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config_path = Some(args.next().context("--config needs a file")?),
            "--state" => parsed.state = Some(args.next().context("--state needs a name")?),
            "--cards" => parsed.cards = true,
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            _ if parsed.prompt.is_none() => parsed.prompt = Some(arg),
            _ => bail!("unexpected argument {}\n{}", arg, USAGE),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let pack = Pack::from_file(&args.pack_path)
        .with_context(|| format!("loading pack {}", args.pack_path))?;

    if args.cards {
        let cards = generate_agent_cards(&pack);
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    let prompt = args.prompt.context(USAGE)?;
    if pack.prompt(&prompt).is_none() {
        log::warn!("Pack {} has no prompt named {}", pack.id, prompt);
    }

    let config = match args.config_path.as_deref() {
        Some(path) => RoutingConfig::from_file(path)
            .with_context(|| format!("loading routing config {}", path))?,
        None => RoutingConfig::default(),
    }
    .with_env_overrides();

    let mut tools = ToolSetup::new(&pack, prompt).with_config(config).build();
    for failure in tools.failures() {
        log::warn!("{}", failure);
    }
    if let Some(state) = args.state.as_deref() {
        tools.register_tools_for_state(state);
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&tools.registry().descriptors())?
    );

    for failure in tools.close() {
        log::warn!("{}", failure);
    }
    Ok(())
}
