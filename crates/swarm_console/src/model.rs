//! Wire model for the swarm control plane.
//!
//! The backend emits snake_case field names (`system_status`, `daily_budget`,
//! `repositories[].swarm`); the camelCase names used by other producers are
//! accepted as aliases. Unknown enum strings decode to neutral variants instead
//! of failing the whole snapshot.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_BUDGET_UNIT: &str = "USD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    #[serde(rename = "system_status", alias = "status")]
    pub status: SystemStatus,
    #[serde(rename = "daily_budget", alias = "budget")]
    pub budget: Budget,
    #[serde(default)]
    pub party: Vec<Agent>,
    #[serde(default, rename = "active_quests", alias = "quests")]
    pub quests: Vec<Quest>,
    #[serde(default, rename = "guardrail_log", alias = "guardrailLog")]
    pub guardrail_log: Vec<GuardrailEntry>,
    #[serde(default, rename = "repositories", alias = "territories")]
    pub territories: Vec<Territory>,
}

impl SystemState {
    pub fn is_halted(&self) -> bool {
        self.status == SystemStatus::Halted
    }

    pub fn agent(&self, agent_id: &str) -> Option<&Agent> {
        self.party.iter().find(|agent| agent.id == agent_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SystemStatus {
    Operational,
    Degraded,
    Halted,
    Unknown(String),
}

impl SystemStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SystemStatus::Operational => "OPERATIONAL",
            SystemStatus::Degraded => "DEGRADED",
            SystemStatus::Halted => "HALTED",
            SystemStatus::Unknown(raw) => raw.as_str(),
        }
    }
}

impl From<String> for SystemStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPERATIONAL" | "ONLINE" => SystemStatus::Operational,
            "DEGRADED" => SystemStatus::Degraded,
            "HALTED" | "STOPPED" => SystemStatus::Halted,
            _ => SystemStatus::Unknown(raw),
        }
    }
}

impl From<SystemStatus> for String {
    fn from(status: SystemStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub max: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default = "default_budget_unit")]
    pub unit: String,
}

fn default_budget_unit() -> String {
    DEFAULT_BUDGET_UNIT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "class", alias = "displayClass")]
    pub class: AgentClass,
    #[serde(default)]
    pub level: u32,
    #[serde(default, rename = "stats", alias = "vitals")]
    pub vitals: Vitals,
    #[serde(default, rename = "current_action", alias = "currentAction")]
    pub current_action: String,
    #[serde(default, rename = "location", alias = "locationTerritoryId")]
    pub location: String,
}

impl Agent {
    /// Stand-in for a territory member whose record is missing from `party`.
    pub fn placeholder(agent_id: &str) -> Self {
        Self {
            id: agent_id.to_string(),
            name: agent_id.to_string(),
            class: AgentClass::default(),
            level: 0,
            vitals: Vitals::default(),
            current_action: String::new(),
            location: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    #[serde(default = "full_gauge")]
    pub hp: f64,
    #[serde(default = "full_gauge")]
    pub mana: f64,
    #[serde(
        default,
        alias = "successRate",
        deserialize_with = "deserialize_rate"
    )]
    pub success_rate: f64,
}

fn full_gauge() -> f64 {
    100.0
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hp: 100.0,
            mana: 100.0,
            success_rate: 0.0,
        }
    }
}

/// Accepts `0.95`, `95` or `"95%"`; percentages are stored as given (0..100).
fn deserialize_rate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRate {
        Number(f64),
        Text(String),
    }

    let raw = Option::<RawRate>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawRate::Number(value)) => value,
        Some(RawRate::Text(text)) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0),
        None => 0.0,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentClass {
    Warrior,
    Wizard,
    Bard,
    Cleric,
    Rogue,
    Paladin,
    Other(String),
}

impl AgentClass {
    pub fn as_str(&self) -> &str {
        match self {
            AgentClass::Warrior => "Warrior",
            AgentClass::Wizard => "Wizard",
            AgentClass::Bard => "Bard",
            AgentClass::Cleric => "Cleric",
            AgentClass::Rogue => "Rogue",
            AgentClass::Paladin => "Paladin",
            AgentClass::Other(raw) => raw.as_str(),
        }
    }

    /// Operational role behind the class name.
    pub fn role(&self) -> AgentRole {
        match self {
            AgentClass::Warrior => AgentRole::Coder,
            AgentClass::Wizard => AgentRole::Architect,
            AgentClass::Bard => AgentRole::ProductManager,
            AgentClass::Cleric => AgentRole::Reviewer,
            AgentClass::Rogue => AgentRole::Analyst,
            AgentClass::Paladin => AgentRole::Security,
            AgentClass::Other(_) => AgentRole::Unassigned,
        }
    }
}

impl Default for AgentClass {
    fn default() -> Self {
        AgentClass::Other(String::new())
    }
}

impl From<String> for AgentClass {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "warrior" | "coder" => AgentClass::Warrior,
            "wizard" | "architect" => AgentClass::Wizard,
            "bard" | "pm" | "product_manager" | "productmanager" => AgentClass::Bard,
            "cleric" | "reviewer" => AgentClass::Cleric,
            "rogue" | "analyst" => AgentClass::Rogue,
            "paladin" | "security" => AgentClass::Paladin,
            _ => AgentClass::Other(raw),
        }
    }
}

impl From<AgentClass> for String {
    fn from(class: AgentClass) -> Self {
        class.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    Coder,
    Architect,
    ProductManager,
    Reviewer,
    Analyst,
    Security,
    Unassigned,
}

impl AgentRole {
    pub const ALL: [AgentRole; 7] = [
        AgentRole::Coder,
        AgentRole::Architect,
        AgentRole::ProductManager,
        AgentRole::Reviewer,
        AgentRole::Analyst,
        AgentRole::Security,
        AgentRole::Unassigned,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgentRole::Coder => "Coder",
            AgentRole::Architect => "Architect",
            AgentRole::ProductManager => "Product Manager",
            AgentRole::Reviewer => "Reviewer",
            AgentRole::Analyst => "Analyst",
            AgentRole::Security => "Security",
            AgentRole::Unassigned => "Unassigned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Territory {
    pub id: String,
    #[serde(default, alias = "displayName")]
    pub name: String,
    #[serde(default, rename = "swarm", alias = "memberAgentIds")]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, alias = "blockedCommand")]
    pub blocked_command: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    Unknown(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
            Severity::Unknown(raw) => raw.as_str(),
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Unknown(String::new())
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Severity::Low,
            "MEDIUM" => Severity::Medium,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Unknown(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

/// `{ "elements": { "nodes": [...], "edges": [...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub elements: GraphElements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphElements {
    #[serde(default)]
    pub nodes: Vec<Element<GraphNode>>,
    #[serde(default)]
    pub edges: Vec<Element<GraphEdge>>,
}

impl GraphData {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self {
            elements: GraphElements {
                nodes: nodes.into_iter().map(Element::from).collect(),
                edges: edges.into_iter().map(Element::from).collect(),
            },
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.elements.nodes.iter().map(Element::inner)
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.elements.edges.iter().map(Element::inner)
    }
}

/// A graph element either flat or wrapped as `{ "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element<T> {
    Wrapped { data: T },
    Flat(T),
}

impl<T> Element<T> {
    pub fn inner(&self) -> &T {
        match self {
            Element::Wrapped { data } => data,
            Element::Flat(data) => data,
        }
    }
}

impl<T> From<T> for Element<T> {
    fn from(data: T) -> Self {
        Element::Wrapped { data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, alias = "semanticTriples")]
    pub triples: Vec<SemanticTriple>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "sourceId")]
    pub source: String,
    #[serde(alias = "targetId")]
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTriple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}
