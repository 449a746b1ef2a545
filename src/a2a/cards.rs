//! Agent card generation from a pack's agents section.

use std::collections::HashMap;

use super::types::{AgentCard, AgentSkill, TEXT_PLAIN};
use crate::pack::Pack;

fn or_text_plain(modes: &[String]) -> Vec<String> {
    if modes.is_empty() {
        vec![TEXT_PLAIN.to_string()]
    } else {
        modes.to_vec()
    }
}

fn first_non_empty(a: &str, b: &str) -> String {
    if a.is_empty() { b } else { a }.to_string()
}

/// Build one agent card per agent member.
///
/// Each card advertises a single skill whose ID is the member key. Names
/// and descriptions come from the member definition, falling back to the
/// member's prompt. Returns an empty map when the pack has no agents.
pub fn generate_agent_cards(pack: &Pack) -> HashMap<String, AgentCard> {
    let Some(agents) = pack.agents.as_ref() else {
        return HashMap::new();
    };

    agents
        .members
        .iter()
        .map(|(member, def)| {
            let (prompt_name, prompt_description) = pack
                .prompt(member)
                .map(|p| (p.name.as_str(), p.description.as_str()))
                .unwrap_or_default();
            let name = first_non_empty(prompt_name, member);
            let description = first_non_empty(&def.description, prompt_description);
            let input_modes = or_text_plain(&def.input_modes);
            let output_modes = or_text_plain(&def.output_modes);

            let skill = AgentSkill {
                id: member.clone(),
                name: name.clone(),
                description: description.clone(),
                tags: def.tags.clone(),
                input_modes: input_modes.clone(),
                output_modes: output_modes.clone(),
            };
            let card = AgentCard {
                name,
                description,
                version: pack.version.clone(),
                skills: vec![skill],
                default_input_modes: input_modes,
                default_output_modes: output_modes,
            };
            (member.clone(), card)
        })
        .collect()
}
