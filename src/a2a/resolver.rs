//! Synthesizes tool descriptors for agent members.
//!
//! A prompt lists the tools it may call; names that match an agent member
//! turn into `a2a__<member>` tools, one descriptor per skill on the
//! member's card. Everything else in the list is left to other resolvers.

use std::collections::HashMap;
use std::sync::Arc;

use super::cards::generate_agent_cards;
use super::endpoint::EndpointResolver;
use super::schema::{agent_input_schema, agent_output_schema};
use super::types::AgentCard;
use super::A2A_NAMESPACE;
use crate::pack::Pack;
use crate::tools::{parse_tool_name, qualify_tool_name, A2AConfig, ToolDescriptor, ToolMode};

/// Strip an `a2a__` qualification, leaving other names untouched.
pub fn member_key(name: &str) -> &str {
    match parse_tool_name(name) {
        (A2A_NAMESPACE, member) => member,
        _ => name,
    }
}

/// Resolves agent member references into tool descriptors.
#[derive(Debug, Clone)]
pub struct AgentToolResolver {
    cards: HashMap<String, AgentCard>,
    endpoint_resolver: Option<Arc<dyn EndpointResolver>>,
}

impl AgentToolResolver {
    /// Build a resolver from a pack's agents section.
    ///
    /// Returns `None` when the pack declares no agents.
    pub fn new(pack: &Pack) -> Option<Self> {
        if !pack.has_agents() {
            return None;
        }
        Some(Self::from_cards(generate_agent_cards(pack)))
    }

    /// Build a resolver over an explicit member-to-card mapping.
    pub fn from_cards(cards: HashMap<String, AgentCard>) -> Self {
        Self {
            cards,
            endpoint_resolver: None,
        }
    }

    /// Set how member names map to endpoint URLs. Without one, descriptors
    /// carry an empty agent URL.
    pub fn set_endpoint_resolver(&mut self, resolver: Arc<dyn EndpointResolver>) {
        self.endpoint_resolver = Some(resolver);
    }

    /// Builder form of [`set_endpoint_resolver`](Self::set_endpoint_resolver).
    pub fn with_endpoint_resolver(mut self, resolver: Arc<dyn EndpointResolver>) -> Self {
        self.set_endpoint_resolver(resolver);
        self
    }

    /// Whether `name` refers to an agent member, bare or `a2a__`-qualified.
    pub fn is_agent_tool(&self, name: &str) -> bool {
        self.cards.contains_key(name) || self.cards.contains_key(member_key(name))
    }

    /// Descriptors for every requested name that is an agent member.
    ///
    /// A member with N skills yields N descriptors, all named
    /// `a2a__<member>`. Unknown names are skipped.
    pub fn resolve_agent_tools<S: AsRef<str>>(&self, names: &[S]) -> Vec<ToolDescriptor> {
        let mut descriptors = Vec::new();
        for name in names {
            let member = member_key(name.as_ref());
            let Some(card) = self.cards.get(member) else {
                continue;
            };

            let agent_url = self.resolve_endpoint(member);
            let tool_name = qualify_tool_name(A2A_NAMESPACE, member);
            for skill in &card.skills {
                let description = if skill.description.is_empty() {
                    card.description.clone()
                } else {
                    skill.description.clone()
                };
                descriptors.push(
                    ToolDescriptor::new(
                        tool_name.clone(),
                        description,
                        agent_input_schema(),
                        ToolMode::A2a,
                    )
                    .with_output_schema(agent_output_schema())
                    .with_a2a_config(A2AConfig {
                        agent_url: agent_url.clone(),
                        skill_id: skill.id.clone(),
                        timeout_ms: None,
                    }),
                );
            }
        }
        descriptors
    }

    fn resolve_endpoint(&self, member: &str) -> String {
        let Some(resolver) = self.endpoint_resolver.as_ref() else {
            return String::new();
        };
        let url = resolver.resolve(member);
        if url.is_empty() {
            log::debug!("No endpoint resolved for agent member {}", member);
        }
        url
    }

    /// All known member names, sorted.
    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cards.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a2a::endpoint::{MapEndpointResolver, StaticEndpointResolver};
    use crate::a2a::types::AgentSkill;
    use crate::pack::{AgentDef, AgentsConfig, PackPrompt};

    fn pack(members: &[(&str, &str)]) -> Pack {
        let mut prompts = HashMap::new();
        let mut defs = HashMap::new();
        for (name, description) in members {
            prompts.insert(
                name.to_string(),
                PackPrompt {
                    name: name.to_string(),
                    description: description.to_string(),
                    ..Default::default()
                },
            );
            defs.insert(
                name.to_string(),
                AgentDef {
                    description: description.to_string(),
                    ..Default::default()
                },
            );
        }
        Pack {
            id: "test-pack".into(),
            version: "1.0.0".into(),
            prompts,
            workflow: None,
            agents: Some(AgentsConfig {
                entry: members[0].0.to_string(),
                members: defs,
            }),
        }
    }

    fn two_skill_resolver() -> AgentToolResolver {
        let card = AgentCard::new("Summarizer", "Summarizes text")
            .with_skill(AgentSkill::new("short", "Short summary"))
            .with_skill(AgentSkill::new("long", ""));
        let mut cards = HashMap::new();
        cards.insert("summarizer".to_string(), card);
        AgentToolResolver::from_cards(cards)
    }

    #[test]
    fn test_new_without_agents() {
        assert!(AgentToolResolver::new(&Pack::default()).is_none());
    }

    #[test]
    fn test_is_agent_tool() {
        let r = AgentToolResolver::new(&pack(&[("summarizer", "Summarizes text")])).unwrap();
        assert!(r.is_agent_tool("summarizer"));
        assert!(r.is_agent_tool("a2a__summarizer"));
        assert!(!r.is_agent_tool("nonexistent"));
        assert!(!r.is_agent_tool("a2a__nonexistent"));
        assert!(!r.is_agent_tool("mcp__summarizer"));
        assert!(!r.is_agent_tool(""));
    }

    #[test]
    fn test_resolve_agent_tools_mixed_list() {
        let r = AgentToolResolver::new(&pack(&[
            ("summarizer", "Summarizes text"),
            ("translator", "Translates text"),
        ]))
        .unwrap();

        let descriptors = r.resolve_agent_tools(&["summarizer", "get_weather", "translator"]);
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name, "a2a__summarizer");
        assert_eq!(descriptors[1].name, "a2a__translator");
        for d in &descriptors {
            assert_eq!(d.mode, ToolMode::A2a);
            assert_eq!(d.namespace.as_deref(), Some("a2a"));
            let config = d.a2a_config.as_ref().unwrap();
            assert!(!config.skill_id.is_empty());
            assert_eq!(config.agent_url, "");
        }
        assert_eq!(descriptors[0].description, "Summarizes text");
    }

    #[test]
    fn test_resolve_agent_tools_one_descriptor_per_skill() {
        let r = two_skill_resolver();
        let descriptors = r.resolve_agent_tools(&["summarizer"]);
        assert_eq!(descriptors.len(), 2);
        assert!(descriptors.iter().all(|d| d.name == "a2a__summarizer"));
        let skills: Vec<&str> = descriptors
            .iter()
            .map(|d| d.a2a_config.as_ref().unwrap().skill_id.as_str())
            .collect();
        assert_eq!(skills, vec!["short", "long"]);
        // Skill without a description inherits the card's.
        assert_eq!(descriptors[1].description, "Summarizes text");
    }

    #[test]
    fn test_resolve_agent_tools_accepts_qualified_names() {
        let r = two_skill_resolver();
        assert_eq!(r.resolve_agent_tools(&["a2a__summarizer"]).len(), 2);
    }

    #[test]
    fn test_resolve_agent_tools_empty_and_unknown() {
        let r = two_skill_resolver();
        let none: [&str; 0] = [];
        assert!(r.resolve_agent_tools(&none).is_empty());
        assert!(r.resolve_agent_tools(&["get_weather", "search_docs"]).is_empty());
    }

    #[test]
    fn test_schemas_on_descriptors() {
        let r = two_skill_resolver();
        let d = &r.resolve_agent_tools(&["summarizer"])[0];
        assert_eq!(d.input_schema["type"], "object");
        assert_eq!(d.input_schema["properties"]["query"]["type"], "string");
        assert_eq!(d.input_schema["required"][0], "query");
        assert_eq!(d.output_schema["properties"]["response"]["type"], "string");
    }

    #[test]
    fn test_static_endpoint() {
        let r = AgentToolResolver::new(&pack(&[("summarizer", "Summarizes text")]))
            .unwrap()
            .with_endpoint_resolver(Arc::new(StaticEndpointResolver::new(
                "http://localhost:8080",
            )));
        let d = &r.resolve_agent_tools(&["summarizer"])[0];
        let config = d.a2a_config.as_ref().unwrap();
        assert_eq!(config.agent_url, "http://localhost:8080");
        assert_eq!(config.skill_id, "summarizer");
    }

    #[test]
    fn test_map_endpoints_and_miss() {
        let mut r = AgentToolResolver::new(&pack(&[
            ("summarizer", "Summarizes text"),
            ("translator", "Translates text"),
        ]))
        .unwrap();
        r.set_endpoint_resolver(Arc::new(
            MapEndpointResolver::default().with_endpoint("summarizer", "http://summarizer:9001"),
        ));

        let descriptors = r.resolve_agent_tools(&["summarizer", "translator"]);
        let urls: HashMap<&str, &str> = descriptors
            .iter()
            .map(|d| (d.name.as_str(), d.a2a_config.as_ref().unwrap().agent_url.as_str()))
            .collect();
        assert_eq!(urls["a2a__summarizer"], "http://summarizer:9001");
        // A miss still yields a descriptor, with an empty URL.
        assert_eq!(urls["a2a__translator"], "");
    }

    #[test]
    fn test_member_names() {
        let r = AgentToolResolver::new(&pack(&[("translator", ""), ("summarizer", "")])).unwrap();
        assert_eq!(r.member_names(), vec!["summarizer", "translator"]);
    }

    #[test]
    fn test_member_key() {
        assert_eq!(member_key("a2a__helper"), "helper");
        assert_eq!(member_key("helper"), "helper");
        assert_eq!(member_key("mcp__helper"), "mcp__helper");
    }
}
