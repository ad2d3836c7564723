//! Costs paid to activate abilities and cast spells

use crate::core::ManaCost;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant for [`Cost`]; each kind is paid by exactly one cost handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostKind {
    Tap,
    Mana,
    PayLife,
}

impl CostKind {
    pub const ALL: [CostKind; 3] = [CostKind::Tap, CostKind::Mana, CostKind::PayLife];
}

/// A cost that must be paid before an action's effects resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Tap the source permanent ({T})
    Tap,

    /// Pay mana from the acting player's pool
    Mana(ManaCost),

    /// Pay life
    PayLife(u32),
}

impl Cost {
    pub fn kind(&self) -> CostKind {
        match self {
            Cost::Tap => CostKind::Tap,
            Cost::Mana(_) => CostKind::Mana,
            Cost::PayLife(_) => CostKind::PayLife,
        }
    }

    pub fn includes_tap(&self) -> bool {
        matches!(self, Cost::Tap)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Tap => write!(f, "{{T}}"),
            Cost::Mana(mana) => write!(f, "{mana}"),
            Cost::PayLife(amount) => write!(f, "Pay {amount} life"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_kinds() {
        assert_eq!(Cost::Tap.kind(), CostKind::Tap);
        assert_eq!(Cost::Mana(ManaCost::EMPTY).kind(), CostKind::Mana);
        assert_eq!(Cost::PayLife(2).kind(), CostKind::PayLife);
        assert!(Cost::Tap.includes_tap());
        assert!(!Cost::PayLife(1).includes_tap());
    }

    #[test]
    fn test_cost_definition_json() {
        let costs: Vec<Cost> =
            serde_json::from_str(r#"["Tap", {"Mana": "{1}{G}"}, {"PayLife": 2}]"#).unwrap();
        assert_eq!(
            costs,
            vec![
                Cost::Tap,
                Cost::Mana(ManaCost::parse("{1}{G}").unwrap()),
                Cost::PayLife(2)
            ]
        );
    }
}
