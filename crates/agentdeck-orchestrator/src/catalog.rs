use agentdeck_core::{AgentdeckError, AgentdeckResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Fixed grouping of agents. Categories run one after another in
/// [`AgentCategory::ORDER`]; agents inside a category run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentCategory {
    Compliance,
    Risk,
    Business,
    Infrastructure,
    Content,
    Strategic,
    Life,
}

impl AgentCategory {
    /// Execution order of the whole system.
    pub const ORDER: [AgentCategory; 7] = [
        AgentCategory::Compliance,
        AgentCategory::Risk,
        AgentCategory::Business,
        AgentCategory::Infrastructure,
        AgentCategory::Content,
        AgentCategory::Strategic,
        AgentCategory::Life,
    ];

    /// Position in [`AgentCategory::ORDER`].
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentCategory::Compliance => write!(f, "compliance"),
            AgentCategory::Risk => write!(f, "risk"),
            AgentCategory::Business => write!(f, "business"),
            AgentCategory::Infrastructure => write!(f, "infrastructure"),
            AgentCategory::Content => write!(f, "content"),
            AgentCategory::Strategic => write!(f, "strategic"),
            AgentCategory::Life => write!(f, "life"),
        }
    }
}

/// Static catalog entry: one node of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub id: String,
    pub name: String,
    pub category: AgentCategory,
    /// Ids that must have succeeded earlier in the same run.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl UnitDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: AgentCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            dependencies: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A dependency edge pointing at an id the catalog does not contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingDependency {
    pub agent_id: String,
    pub missing: String,
}

/// Immutable, ordered set of descriptors keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    descriptors: Vec<UnitDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog. Fails on empty or duplicate ids.
    pub fn new(descriptors: Vec<UnitDescriptor>) -> AgentdeckResult<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (pos, descriptor) in descriptors.iter().enumerate() {
            if descriptor.id.trim().is_empty() {
                return Err(AgentdeckError::Catalog(format!(
                    "descriptor '{}' has an empty id",
                    descriptor.name
                )));
            }
            if index.insert(descriptor.id.clone(), pos).is_some() {
                return Err(AgentdeckError::Catalog(format!(
                    "duplicate id '{}'",
                    descriptor.id
                )));
            }
        }
        Ok(Self { descriptors, index })
    }

    pub fn get(&self, id: &str) -> Option<&UnitDescriptor> {
        self.index.get(id).map(|&pos| &self.descriptors[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &[UnitDescriptor] {
        &self.descriptors
    }

    /// Descriptors of one category, in declaration order.
    pub fn in_category(&self, category: AgentCategory) -> Vec<&UnitDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.descriptors.iter().filter(|d| d.enabled).count()
    }

    /// Dependency edges that reference ids outside the catalog. Such
    /// dependents can never run; they are reported, not rejected.
    pub fn dangling_dependencies(&self) -> Vec<DanglingDependency> {
        self.descriptors
            .iter()
            .flat_map(|d| {
                d.dependencies
                    .iter()
                    .filter(|dep| !self.contains(dep))
                    .map(|dep| DanglingDependency {
                        agent_id: d.id.clone(),
                        missing: dep.clone(),
                    })
            })
            .collect()
    }

    /// Dependency edges between two agents of the same category. Their
    /// dependents race against the dependency (both start together).
    pub fn same_category_dependencies(&self) -> Vec<(String, String)> {
        self.descriptors
            .iter()
            .flat_map(|d| {
                d.dependencies.iter().filter_map(move |dep| {
                    self.get(dep)
                        .filter(|target| target.category == d.category)
                        .map(|target| (d.id.clone(), target.id.clone()))
                })
            })
            .collect()
    }

    /// Whether the dependency graph contains a cycle.
    pub fn has_cycle(&self) -> bool {
        let mut visited = HashMap::new();
        self.descriptors
            .iter()
            .any(|d| self.dfs_cycle(&d.id, &mut visited))
    }

    fn dfs_cycle<'a>(&'a self, id: &'a str, visited: &mut HashMap<&'a str, u8>) -> bool {
        match visited.get(id) {
            Some(1) => return true,  // back edge = cycle
            Some(2) => return false, // already processed
            _ => {}
        }
        visited.insert(id, 1);
        if let Some(descriptor) = self.get(id) {
            for dep in &descriptor.dependencies {
                if self.dfs_cycle(dep, visited) {
                    return true;
                }
            }
        }
        visited.insert(id, 2);
        false
    }

    /// Categories that have at least one descriptor, in execution order.
    pub fn populated_categories(&self) -> Vec<AgentCategory> {
        let present: HashSet<AgentCategory> = self.descriptors.iter().map(|d| d.category).collect();
        AgentCategory::ORDER
            .into_iter()
            .filter(|c| present.contains(c))
            .collect()
    }
}
