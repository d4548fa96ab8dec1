//! Conditional display rules over field values.
//!
//! A type can carry rules that show, hide, or require fields depending on
//! the values already in a payload. Rules evaluate in declaration order;
//! for a given field the latest matching action wins, so a later `Show`
//! cancels an earlier `Hide` and vice versa.

use std::cmp::Ordering;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use worldsmith_foundation::Value;

use crate::typedef::Payload;

/// How a rule combines its conditions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatchMode {
    /// Every condition must hold (AND). Vacuously true with no conditions.
    All,
    /// At least one condition must hold (ANY).
    Any,
    /// No condition may hold (NONE). Vacuously true with no conditions.
    None,
}

/// Comparison operator for a single condition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConditionOp {
    /// Loose equality (numbers promote, text matches choice).
    Equals,
    /// Negation of [`Equals`](Self::Equals). An absent field is not equal.
    NotEquals,
    /// Substring match on text; exact match on a choice.
    Contains,
    /// Strict ordering above the condition value.
    GreaterThan,
    /// Strict ordering below the condition value.
    LessThan,
    /// Field is present and non-nil. The condition value is ignored.
    IsSet,
    /// Field is absent or nil. The condition value is ignored.
    IsNotSet,
}

/// A single condition evaluated against a payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Condition {
    /// The field the condition inspects.
    pub field: String,
    /// The comparison operator.
    pub op: ConditionOp,
    /// The value compared against (ignored by the presence operators).
    pub value: Value,
}

impl Condition {
    /// Creates a condition.
    #[must_use]
    pub fn new(field: impl Into<String>, op: ConditionOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality condition.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, ConditionOp::Equals, value)
    }

    /// Shorthand for a presence condition.
    #[must_use]
    pub fn is_set(field: impl Into<String>) -> Self {
        Self::new(field, ConditionOp::IsSet, Value::Nil)
    }

    /// Evaluates the condition against a payload.
    #[must_use]
    pub fn eval(&self, payload: &Payload) -> bool {
        let current = payload.get(&self.field);
        let set = current.is_some_and(|v| !v.is_nil());

        match self.op {
            ConditionOp::IsSet => set,
            ConditionOp::IsNotSet => !set,
            ConditionOp::Equals => current.is_some_and(|v| v.loose_eq(&self.value)),
            ConditionOp::NotEquals => !current.is_some_and(|v| v.loose_eq(&self.value)),
            ConditionOp::Contains => match (current, self.value.as_str()) {
                (Some(Value::Text(haystack)), Some(needle)) => haystack.contains(needle),
                (Some(Value::Choice(selected)), Some(needle)) => selected.as_ref() == needle,
                _ => false,
            },
            ConditionOp::GreaterThan => {
                current.and_then(|v| v.compare(&self.value)) == Some(Ordering::Greater)
            }
            ConditionOp::LessThan => {
                current.and_then(|v| v.compare(&self.value)) == Some(Ordering::Less)
            }
        }
    }
}

/// What a matching rule does to a field.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RuleAction {
    /// Display the field (cancels an earlier hide).
    Show(String),
    /// Hide the field from display and exempt it from its required flag.
    Hide(String),
    /// Make the field required for this payload.
    Require(String),
}

impl RuleAction {
    /// The field the action targets.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Show(f) | Self::Hide(f) | Self::Require(f) => f,
        }
    }
}

/// A conditional display rule attached to a type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldRule {
    /// Rule name, for diagnostics.
    pub name: String,
    /// Condition combination mode.
    pub mode: MatchMode,
    /// The conditions.
    pub conditions: Vec<Condition>,
    /// Actions applied when the rule matches.
    pub actions: Vec<RuleAction>,
}

impl FieldRule {
    /// Creates an empty rule with the given name and mode.
    #[must_use]
    pub fn new(name: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            name: name.into(),
            mode,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Adds a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds an action.
    #[must_use]
    pub fn with_action(mut self, action: RuleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Evaluates the rule's conditions against a payload.
    #[must_use]
    pub fn matches(&self, payload: &Payload) -> bool {
        match self.mode {
            MatchMode::All => self.conditions.iter().all(|c| c.eval(payload)),
            MatchMode::Any => self.conditions.iter().any(|c| c.eval(payload)),
            MatchMode::None => !self.conditions.iter().any(|c| c.eval(payload)),
        }
    }
}

/// Accumulated effect of a rule set on one payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    hidden: BTreeSet<String>,
    required: BTreeSet<String>,
}

impl RuleOutcome {
    /// Returns true if the field ends up hidden.
    #[must_use]
    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden.contains(field)
    }

    /// Returns true if a rule made the field required.
    #[must_use]
    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
    }

    /// The fields hidden by the rule set.
    #[must_use]
    pub fn hidden(&self) -> &BTreeSet<String> {
        &self.hidden
    }

    /// The fields required by the rule set.
    #[must_use]
    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }
}

/// Evaluates a rule set against a payload.
///
/// Rules apply in order; the latest action targeting a field wins.
#[must_use]
pub fn evaluate_rules(rules: &[FieldRule], payload: &Payload) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    for rule in rules {
        if !rule.matches(payload) {
            continue;
        }
        for action in &rule.actions {
            match action {
                RuleAction::Show(field) => {
                    outcome.hidden.remove(field);
                }
                RuleAction::Hide(field) => {
                    outcome.hidden.insert(field.clone());
                }
                RuleAction::Require(field) => {
                    outcome.required.insert(field.clone());
                }
            }
        }
    }

    outcome
}
