//! Agent endpoint resolution.
//!
//! An [`EndpointResolver`] maps an agent member name to the base URL it can
//! be reached at. An empty string means "no reachable endpoint": callers
//! skip or defer, they do not treat it as an error.

use std::collections::HashMap;
use std::fmt;

/// Maps agent member names to base URLs.
pub trait EndpointResolver: Send + Sync + fmt::Debug {
    /// Base URL for `agent_name`, or an empty string when unknown.
    fn resolve(&self, agent_name: &str) -> String;
}

/// Resolves every agent to the same base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEndpointResolver {
    pub base_url: String,
}

impl StaticEndpointResolver {
    /// Create a resolver that always answers `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl EndpointResolver for StaticEndpointResolver {
    fn resolve(&self, _agent_name: &str) -> String {
        self.base_url.clone()
    }
}

/// Resolves agents through an exact-match table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEndpointResolver {
    pub endpoints: HashMap<String, String>,
}

impl MapEndpointResolver {
    /// Create a resolver over a member-to-URL table.
    pub fn new(endpoints: HashMap<String, String>) -> Self {
        Self { endpoints }
    }

    /// Builder method to add one entry.
    pub fn with_endpoint(mut self, agent: impl Into<String>, url: impl Into<String>) -> Self {
        self.endpoints.insert(agent.into(), url.into());
        self
    }
}

impl EndpointResolver for MapEndpointResolver {
    fn resolve(&self, agent_name: &str) -> String {
        self.endpoints.get(agent_name).cloned().unwrap_or_default()
    }
}

/// Table lookup with a shared base URL for members missing from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEndpointResolver {
    pub endpoints: MapEndpointResolver,
    pub fallback: StaticEndpointResolver,
}

impl EndpointResolver for FallbackEndpointResolver {
    fn resolve(&self, agent_name: &str) -> String {
        let url = self.endpoints.resolve(agent_name);
        if url.is_empty() {
            self.fallback.resolve(agent_name)
        } else {
            url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_endpoint_resolver() {
        let r = StaticEndpointResolver::new("http://localhost:9000");
        assert_eq!(r.resolve("any-agent"), "http://localhost:9000");
        assert_eq!(r.resolve("another-agent"), "http://localhost:9000");
        assert_eq!(r.resolve(""), "http://localhost:9000");
    }

    #[test]
    fn test_map_endpoint_resolver() {
        let r = MapEndpointResolver::default()
            .with_endpoint("summarizer", "http://summarizer:9001")
            .with_endpoint("translator", "http://translator:9002");
        assert_eq!(r.resolve("summarizer"), "http://summarizer:9001");
        assert_eq!(r.resolve("translator"), "http://translator:9002");
        assert_eq!(r.resolve("unknown"), "");
        assert_eq!(r.resolve("Summarizer"), "");
    }

    #[test]
    fn test_fallback_endpoint_resolver() {
        let r = FallbackEndpointResolver {
            endpoints: MapEndpointResolver::default().with_endpoint("summarizer", "http://s:1"),
            fallback: StaticEndpointResolver::new("http://gateway:8080"),
        };
        assert_eq!(r.resolve("summarizer"), "http://s:1");
        assert_eq!(r.resolve("translator"), "http://gateway:8080");
    }
}
