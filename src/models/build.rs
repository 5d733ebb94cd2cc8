use serde::Serialize;
use std::collections::BTreeMap;

use super::{Part, PartType};

/// Top-scoring eligible parts per type, best first
///
/// Types for which no eligible part was found are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CandidateSet {
    by_type: BTreeMap<PartType, Vec<Part>>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the candidates for a type; an empty list leaves the type absent
    pub fn insert(&mut self, part_type: PartType, parts: Vec<Part>) {
        if parts.is_empty() {
            self.by_type.remove(&part_type);
        } else {
            self.by_type.insert(part_type, parts);
        }
    }

    pub fn get(&self, part_type: PartType) -> &[Part] {
        self.by_type
            .get(&part_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (PartType, &[Part])> {
        self.by_type.iter().map(|(t, parts)| (*t, parts.as_slice()))
    }

    /// Essential types without a single candidate
    pub fn missing_types(&self) -> Vec<PartType> {
        PartType::ESSENTIAL
            .into_iter()
            .filter(|t| !self.by_type.contains_key(t))
            .collect()
    }

    /// Every essential type has at least one candidate
    pub fn is_complete(&self) -> bool {
        PartType::ESSENTIAL
            .iter()
            .all(|t| self.by_type.contains_key(t))
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Size of the search space the optimizer would enumerate
    pub fn combination_count(&self) -> usize {
        if !self.is_complete() {
            return 0;
        }
        self.by_type.values().map(Vec::len).product()
    }
}

/// One chosen part per essential type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Build {
    pub parts: BTreeMap<PartType, Part>,
    /// Usage-weighted sum of part scores
    pub score: f64,
}

impl Build {
    pub fn get(&self, part_type: PartType) -> Option<&Part> {
        self.parts.get(&part_type)
    }

    pub fn total_price(&self) -> f64 {
        self.parts.values().map(|p| p.price).sum()
    }

    pub fn cpu_socket(&self) -> Option<&str> {
        self.get(PartType::Cpu).and_then(Part::socket)
    }

    pub fn motherboard_socket(&self) -> Option<&str> {
        self.get(PartType::Motherboard).and_then(Part::socket)
    }
}

/// Outcome of a recommendation request
///
/// The candidate set is always present so callers can offer alternatives
/// even when no complete build fits the budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub build: Option<Build>,
    pub candidates: CandidateSet,
}
