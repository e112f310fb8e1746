use serde::{Deserialize, Serialize};

/// Raw dataset node as fetched from the collaborator, before validation.
/// The same shape serves the root, platform branches and game leaves;
/// `hierarchy::build` enforces which fields must be present where.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Dataset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Dataset {
    /// Public datasets carry values both as JSON numbers and as numeric
    /// strings; accept either.
    pub fn numeric_value(&self) -> Option<f64> {
        match &self.value {
            Some(serde_json::Value::Number(n)) => n.as_f64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Sum of leaf values, computed once by the builder.
    pub weight: f64,
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Tree {
    pub name: String,
    /// Sum of all leaf values.
    pub total: f64,
    pub branches: Vec<Branch>,
}

impl Tree {
    pub fn leaf_count(&self) -> usize {
        self.branches.iter().map(|b| b.leaves.len()).sum()
    }
}
