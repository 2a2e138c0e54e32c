//! Named memory-one strategy catalog
//!
//! The deterministic cooperator/defector variants the experiments draw
//! from. Names are the stable identity used for ordering and ID encoding;
//! the cooperation mask is over the previous round in (CC, CD, DC, DD)
//! order.

use dilemma_common::{Action, AgentSpec, MemoryOnePolicy};

/// The full strategy roster: (name, initial move, cooperation mask)
const CATALOG: &[(&str, Action, [bool; 4])] = &[
    ("Bitter Cooperator", Action::Cooperate, [true, false, true, true]),
    ("Cooperator", Action::Cooperate, [true, true, true, true]),
    ("Fourteen Coop", Action::Cooperate, [true, true, true, false]),
    ("Grim Trigger", Action::Cooperate, [true, false, false, false]),
    ("Thirteen Coop", Action::Cooperate, [true, true, false, true]),
    ("Tit For Tat", Action::Cooperate, [true, false, true, false]),
    ("Win-Stay Lose-Shift", Action::Cooperate, [true, false, false, true]),
    ("Defector", Action::Defect, [false, false, false, false]),
    ("Fourteen Defect", Action::Defect, [true, true, true, false]),
    ("Stubborn Defect", Action::Defect, [true, false, false, false]),
    ("Suspicious Tit For Tat", Action::Defect, [true, false, true, false]),
    ("Sucker Defect", Action::Defect, [false, true, false, false]),
    ("Two Defect", Action::Defect, [false, false, true, false]),
    ("Win-Shift Lose-Stay", Action::Defect, [false, true, true, false]),
];

/// All catalog strategies as agent specs, in catalog order
pub fn standard_catalog() -> Vec<AgentSpec> {
    CATALOG
        .iter()
        .map(|(name, initial, mask)| AgentSpec::new(*name, MemoryOnePolicy::from_mask(*initial, *mask)))
        .collect()
}

/// All catalog strategy names, in catalog order
pub fn standard_names() -> Vec<String> {
    CATALOG.iter().map(|(name, _, _)| name.to_string()).collect()
}

/// Look up a single strategy by name
pub fn by_name(name: &str) -> Option<AgentSpec> {
    CATALOG
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(n, initial, mask)| AgentSpec::new(*n, MemoryOnePolicy::from_mask(*initial, *mask)))
}
