//! # Filter Predicate Builder
//!
//! Turns the user's filter input into a single predicate over an item.
//!
//! ## Combination Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  matches(item) =                                                        │
//! │                                                                         │
//! │     search(item)            type ∋ term  OR color ∋ term  OR size ∋ term │
//! │         AND                 OR season ∋ term OR gender ∋ term           │
//! │     constraint₁(item)       OR id ∋ term OR price ∋ term                │
//! │         AND                                                             │
//! │     constraint₂(item)       field == value (case-insensitive)           │
//! │         AND ...                                                         │
//! │                                                                         │
//! │  Empty term → search passes.   Constraint "all" → constraint passes.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Field, Item};

/// Constraint value meaning "no restriction on this field".
pub const MATCH_ANY: &str = "all";

// =============================================================================
// Constraint
// =============================================================================

/// The selection for one field.
///
/// Serialized as a plain string so it matches the dropdown values the UI
/// sends (`"all"` or a category label).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Constraint {
    /// The "all" sentinel.
    #[default]
    Any,
    /// Case-insensitive exact match on the field's value.
    Equals(String),
}

impl Constraint {
    /// Parses a dropdown value. `"all"` (any case) and `""` mean [`Constraint::Any`].
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case(MATCH_ANY) {
            Constraint::Any
        } else {
            Constraint::Equals(value.to_string())
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Constraint::Equals(_))
    }
}

impl From<String> for Constraint {
    fn from(value: String) -> Self {
        Constraint::parse(&value)
    }
}

impl From<Constraint> for String {
    fn from(constraint: Constraint) -> Self {
        match constraint {
            Constraint::Any => MATCH_ANY.to_string(),
            Constraint::Equals(value) => value,
        }
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// Search term plus per-field constraints.
///
/// A value object: every user edit produces a new `FilterState`. Fields set
/// back to "all" are dropped from the map, so two states that filter the
/// same way compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub constraints: BTreeMap<Field, Constraint>,
}

impl FilterState {
    /// The empty filter: matches everything.
    pub fn new() -> Self {
        FilterState::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_constraint(mut self, field: Field, constraint: Constraint) -> Self {
        if constraint.is_active() {
            self.constraints.insert(field, constraint);
        } else {
            self.constraints.remove(&field);
        }
        self
    }

    /// Current constraint for a field (`Any` when unset).
    pub fn constraint(&self, field: Field) -> &Constraint {
        static ANY: Constraint = Constraint::Any;
        self.constraints.get(&field).unwrap_or(&ANY)
    }

    /// True when neither search nor any constraint restricts the result.
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && !self.constraints.values().any(Constraint::is_active)
    }

    /// Builds the predicate for this state.
    pub fn predicate(&self) -> Predicate {
        build(&self.search_term, &self.constraints)
    }
}

// =============================================================================
// Predicate
// =============================================================================

/// A compiled filter. Both the term and constraint values are lowercased
/// once here instead of once per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    needle: Option<String>,
    required: Vec<(Field, String)>,
}

/// Builds the predicate for a search term and a set of field constraints.
///
/// ## Example
/// ```rust
/// use std::collections::BTreeMap;
/// use wardrobe_core::filter::{build, Constraint};
/// use wardrobe_core::types::Field;
///
/// let mut constraints = BTreeMap::new();
/// constraints.insert(Field::Gender, Constraint::parse("feminino"));
/// constraints.insert(Field::Season, Constraint::parse("all"));
///
/// let predicate = build("vest", &constraints);
/// assert_eq!(predicate.active_constraints(), 1);
/// ```
pub fn build(search_term: &str, constraints: &BTreeMap<Field, Constraint>) -> Predicate {
    let needle = (!search_term.is_empty()).then(|| search_term.to_lowercase());
    let required = constraints
        .iter()
        .filter_map(|(field, constraint)| match constraint {
            Constraint::Equals(value) => Some((*field, value.to_lowercase())),
            Constraint::Any => None,
        })
        .collect();

    Predicate { needle, required }
}

impl Predicate {
    /// The predicate that accepts every item.
    pub fn match_all() -> Self {
        Predicate {
            needle: None,
            required: Vec::new(),
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.needle.is_none() && self.required.is_empty()
    }

    pub fn active_constraints(&self) -> usize {
        self.required.len()
    }

    /// Search test AND every constraint.
    pub fn matches(&self, item: &Item) -> bool {
        self.matches_search(item) && self.matches_constraints(item)
    }

    fn matches_search(&self, item: &Item) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };

        Field::SEARCHABLE
            .iter()
            .any(|field| item.field(*field).to_lowercase().contains(needle))
            || item.id.to_string().contains(needle)
            || item.price.to_search_string().contains(needle)
    }

    fn matches_constraints(&self, item: &Item) -> bool {
        self.required
            .iter()
            .all(|(field, value)| item.field(*field).to_lowercase() == *value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
