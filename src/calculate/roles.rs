//! Agent to role archetype lookup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleArchetype {
    Duelist,
    Initiator,
    Controller,
    Sentinel,
}

impl RoleArchetype {
    pub const ALL: [RoleArchetype; 4] = [
        RoleArchetype::Duelist,
        RoleArchetype::Initiator,
        RoleArchetype::Controller,
        RoleArchetype::Sentinel,
    ];
}

const AGENT_ROLES: &[(&str, RoleArchetype)] = &[
    ("jett", RoleArchetype::Duelist),
    ("reyna", RoleArchetype::Duelist),
    ("raze", RoleArchetype::Duelist),
    ("phoenix", RoleArchetype::Duelist),
    ("yoru", RoleArchetype::Duelist),
    ("neon", RoleArchetype::Duelist),
    ("iso", RoleArchetype::Duelist),
    ("waylay", RoleArchetype::Duelist),
    ("sova", RoleArchetype::Initiator),
    ("breach", RoleArchetype::Initiator),
    ("skye", RoleArchetype::Initiator),
    ("kayo", RoleArchetype::Initiator),
    ("fade", RoleArchetype::Initiator),
    ("gekko", RoleArchetype::Initiator),
    ("tejo", RoleArchetype::Initiator),
    ("brimstone", RoleArchetype::Controller),
    ("omen", RoleArchetype::Controller),
    ("viper", RoleArchetype::Controller),
    ("astra", RoleArchetype::Controller),
    ("harbor", RoleArchetype::Controller),
    ("clove", RoleArchetype::Controller),
    ("killjoy", RoleArchetype::Sentinel),
    ("cypher", RoleArchetype::Sentinel),
    ("sage", RoleArchetype::Sentinel),
    ("chamber", RoleArchetype::Sentinel),
    ("deadlock", RoleArchetype::Sentinel),
    ("vyse", RoleArchetype::Sentinel),
];

/// Role for an agent name. Case and punctuation are ignored ("KAY/O").
pub fn role_for_agent(agent: &str) -> Option<RoleArchetype> {
    let key: String = agent
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    AGENT_ROLES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, role)| *role)
}
