//! Relationship types for the content graph.
//!
//! Relationship classification and semantic weighting are both driven by
//! declarative rule tables over `RelationshipType` rather than ad hoc
//! branching, so adding a type means adding one row per table.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// Default semantic weight for relationship types without a table entry,
/// including edges whose relationship record is missing.
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 2.0;

/// Multiplier applied when an edge type is in the caller's preferred set.
pub const PREFERRED_WEIGHT_FACTOR: f64 = 0.5;

/// Unique identifier for a relationship record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(String);

impl RelationshipId {
    /// Create a new RelationshipId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelationshipId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RelationshipId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Type of a directed relationship between two content nodes.
///
/// `Unknown` is both the catch-all for unrecognized wire values and the
/// type reported for an edge whose relationship record is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Membership in a collection or pathway.
    BelongsTo,
    /// General association.
    RelatesTo,
    /// Hard prerequisite dependency.
    DependsOn,
    /// Concrete realization of an abstract node.
    Implements,
    /// Specialization or refinement.
    Extends,
    /// Structural containment.
    Contains,
    /// Citation-style reference.
    References,
    /// Ordering constraint in a learning path.
    Prerequisite,
    /// Worked example of a concept.
    ExampleOf,
    /// Unrecognized or missing relationship record.
    #[serde(other)]
    Unknown,
}

/// Broad category of a relationship type.
///
/// Hierarchical types can form ownership/ordering structure (and are the
/// ones cycle checks care about upstream); associative types are free-form
/// links; referential types point without implying structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipCategory {
    /// Containment, dependency, ordering.
    Hierarchical,
    /// Peer-to-peer association.
    Associative,
    /// Pointer without structural weight.
    Referential,
}

impl RelationshipType {
    /// Base weight used by the semantic pathfinding variant.
    ///
    /// Lower weight = stronger semantic pull. Types without a row fall back
    /// to [`DEFAULT_SEMANTIC_WEIGHT`].
    pub fn base_weight(&self) -> f64 {
        match self {
            Self::BelongsTo => 1.0,
            Self::RelatesTo => 2.0,
            Self::DependsOn => 1.5,
            Self::Implements => 1.0,
            Self::Extends => 1.5,
            _ => DEFAULT_SEMANTIC_WEIGHT,
        }
    }

    /// Classify the relationship type.
    pub fn category(&self) -> RelationshipCategory {
        match self {
            Self::BelongsTo | Self::Contains | Self::DependsOn | Self::Prerequisite => {
                RelationshipCategory::Hierarchical
            }
            Self::RelatesTo | Self::Implements | Self::Extends | Self::ExampleOf => {
                RelationshipCategory::Associative
            }
            Self::References | Self::Unknown => RelationshipCategory::Referential,
        }
    }
}

impl Default for RelationshipType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BelongsTo => "BELONGS_TO",
            Self::RelatesTo => "RELATES_TO",
            Self::DependsOn => "DEPENDS_ON",
            Self::Implements => "IMPLEMENTS",
            Self::Extends => "EXTENDS",
            Self::Contains => "CONTAINS",
            Self::References => "REFERENCES",
            Self::Prerequisite => "PREREQUISITE",
            Self::ExampleOf => "EXAMPLE_OF",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// A directed edge in the content graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRelationship {
    /// Relationship identifier.
    pub id: RelationshipId,
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Type of the relationship.
    pub relationship_type: RelationshipType,
    /// Free-form metadata attached by the store.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl ContentRelationship {
    /// Create a relationship with no metadata.
    pub fn new(
        id: impl Into<RelationshipId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            relationship_type,
            metadata: serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weight_table() {
        assert_eq!(RelationshipType::BelongsTo.base_weight(), 1.0);
        assert_eq!(RelationshipType::RelatesTo.base_weight(), 2.0);
        assert_eq!(RelationshipType::DependsOn.base_weight(), 1.5);
        assert_eq!(RelationshipType::Implements.base_weight(), 1.0);
        assert_eq!(RelationshipType::Extends.base_weight(), 1.5);
        // Types outside the table use the default
        assert_eq!(
            RelationshipType::Contains.base_weight(),
            DEFAULT_SEMANTIC_WEIGHT
        );
        assert_eq!(
            RelationshipType::Unknown.base_weight(),
            DEFAULT_SEMANTIC_WEIGHT
        );
    }

    #[test]
    fn test_category_rule_table() {
        assert_eq!(
            RelationshipType::Contains.category(),
            RelationshipCategory::Hierarchical
        );
        assert_eq!(
            RelationshipType::RelatesTo.category(),
            RelationshipCategory::Associative
        );
        assert_eq!(
            RelationshipType::References.category(),
            RelationshipCategory::Referential
        );
    }

    #[test]
    fn test_wire_form_round_trip() {
        let json = serde_json::to_string(&RelationshipType::BelongsTo).unwrap();
        assert_eq!(json, "\"BELONGS_TO\"");

        let parsed: RelationshipType = serde_json::from_str("\"RELATES_TO\"").unwrap();
        assert_eq!(parsed, RelationshipType::RelatesTo);
    }

    #[test]
    fn test_unrecognized_wire_value_maps_to_unknown() {
        let parsed: RelationshipType = serde_json::from_str("\"SIMILAR_TO\"").unwrap();
        assert_eq!(parsed, RelationshipType::Unknown);
    }
}
