//! Property-based tests for build recommendation
//!
//! Random catalogs hold at most four parts per type, below the candidate
//! limit, so every affordable part is a candidate and the search is
//! exhaustive. Prices are whole dollars to keep sums exact.

use proptest::prelude::*;

use rig_builder::{
    models::{Build, CandidateSet, Part, PartType, UsageProfile},
    services::{Catalog, ProfileTables, Recommender},
};

// =============================================================================
// Strategies
// =============================================================================

fn socket_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("S1".to_string()), Just("S2".to_string())]
}

fn usage_strategy() -> impl Strategy<Value = UsageProfile> {
    prop_oneof![
        Just(UsageProfile::Gaming),
        Just(UsageProfile::Design),
        Just(UsageProfile::VideoEditing),
        Just(UsageProfile::OfficeWork),
    ]
}

/// Parts of one type; CPUs occasionally lack a socket
fn part_strategy(part_type: PartType) -> BoxedStrategy<Part> {
    let socket = match part_type {
        PartType::Cpu => prop_oneof![
            3 => socket_strategy().prop_map(Some),
            1 => Just(None),
        ]
        .boxed(),
        PartType::Motherboard => socket_strategy().prop_map(Some).boxed(),
        _ => Just(None).boxed(),
    };

    (10u32..600, 0u32..100, socket)
        .prop_map(move |(price, score, socket)| {
            let mut part = Part::new(
                part_type,
                format!("{} {}/{}", part_type, price, score),
                f64::from(price),
                f64::from(score),
            );
            part.socket = socket;
            part
        })
        .boxed()
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Part>> {
    PartType::ESSENTIAL
        .into_iter()
        .map(|t| prop::collection::vec(part_strategy(t), 1..=4).boxed())
        .collect::<Vec<_>>()
        .prop_map(|groups| groups.into_iter().flatten().collect())
}

fn recommender(parts: Vec<Part>) -> Recommender {
    Recommender::new(Catalog::new(parts), ProfileTables::default())
}

/// Best valid score by plain enumeration of every combination
fn exhaustive_best_score(
    candidates: &CandidateSet,
    tables: &ProfileTables,
    usage: UsageProfile,
    budget: f64,
) -> Option<f64> {
    fn walk(
        slot: usize,
        chosen: &mut Vec<Part>,
        candidates: &CandidateSet,
        tables: &ProfileTables,
        usage: UsageProfile,
        budget: f64,
        best: &mut Option<f64>,
    ) {
        if slot == PartType::ESSENTIAL.len() {
            let total: f64 = chosen.iter().map(|p| p.price).sum();
            let cpu = chosen[0].socket();
            let motherboard = chosen[1].socket();
            if total > budget || cpu.is_none() || cpu != motherboard {
                return;
            }
            let score: f64 = chosen
                .iter()
                .map(|p| p.score * tables.synergy_weight(usage, p.part_type))
                .sum();
            if best.map_or(true, |b| score > b) {
                *best = Some(score);
            }
            return;
        }

        for part in candidates.get(PartType::ESSENTIAL[slot]) {
            chosen.push(part.clone());
            walk(slot + 1, chosen, candidates, tables, usage, budget, best);
            chosen.pop();
        }
    }

    let mut best = None;
    walk(0, &mut Vec::new(), candidates, tables, usage, budget, &mut best);
    best
}

fn assert_valid_build(build: &Build, budget: f64) -> Result<(), TestCaseError> {
    prop_assert_eq!(build.parts.len(), 7);
    for part_type in PartType::ESSENTIAL {
        let part = build.get(part_type);
        prop_assert!(part.is_some());
        prop_assert_eq!(part.map(|p| p.part_type), Some(part_type));
    }
    prop_assert!(build.total_price() <= budget);
    prop_assert!(build.cpu_socket().is_some());
    prop_assert_eq!(build.cpu_socket(), build.motherboard_socket());
    Ok(())
}

// =============================================================================
// Build Invariants
// =============================================================================

proptest! {
    /// A returned build covers every type, fits the budget and is socket compatible
    #[test]
    fn build_is_complete_affordable_and_compatible(
        parts in catalog_strategy(),
        usage in usage_strategy(),
        budget in 200u32..4000,
    ) {
        let budget = f64::from(budget);
        let recommendation = recommender(parts).recommend(budget, usage);
        if let Some(build) = recommendation.build {
            assert_valid_build(&build, budget)?;
        }
    }

    /// Every chosen part is one of the candidates for its type
    #[test]
    fn build_parts_come_from_candidates(
        parts in catalog_strategy(),
        usage in usage_strategy(),
        budget in 200u32..4000,
    ) {
        let recommendation = recommender(parts).recommend(f64::from(budget), usage);
        if let Some(build) = recommendation.build {
            for (part_type, part) in &build.parts {
                prop_assert!(recommendation.candidates.get(*part_type).contains(part));
            }
        }
    }

    /// The pruned search finds the same best score as plain enumeration
    #[test]
    fn search_matches_exhaustive_enumeration(
        parts in catalog_strategy(),
        usage in usage_strategy(),
        budget in 200u32..4000,
    ) {
        let budget = f64::from(budget);
        let tables = ProfileTables::default();
        let recommendation = recommender(parts).recommend(budget, usage);

        let expected = exhaustive_best_score(&recommendation.candidates, &tables, usage, budget);
        let actual = recommendation.build.map(|b| b.score);
        match (expected, actual) {
            (Some(expected), Some(actual)) => prop_assert!((expected - actual).abs() < 1e-9),
            (expected, actual) => prop_assert_eq!(expected, actual),
        }
    }

    /// Candidate lists are sorted by score and never exceed the limit
    #[test]
    fn candidates_are_ranked_and_bounded(
        parts in catalog_strategy(),
        usage in usage_strategy(),
        budget in 200u32..4000,
        limit in 1usize..4,
    ) {
        let recommender = recommender(parts).with_candidate_limit(limit);
        let recommendation = recommender.recommend(f64::from(budget), usage);
        for (part_type, list) in recommendation.candidates.iter() {
            prop_assert!(!list.is_empty() && list.len() <= limit);
            prop_assert!(list.windows(2).all(|w| w[0].score >= w[1].score));
            if part_type == PartType::Cpu {
                prop_assert!(list.iter().all(|p| p.socket().is_some()));
            }
        }
    }
}

// =============================================================================
// Determinism and Fallbacks
// =============================================================================

proptest! {
    /// The same inputs always give the same recommendation
    #[test]
    fn recommendation_is_deterministic(
        parts in catalog_strategy(),
        usage in usage_strategy(),
        budget in 200u32..4000,
    ) {
        let recommender = recommender(parts);
        let first = recommender.recommend(f64::from(budget), usage);
        let second = recommender.recommend(f64::from(budget), usage);
        prop_assert_eq!(first, second);
    }

    /// Unknown usage names behave exactly like gaming
    #[test]
    fn unknown_usage_matches_gaming(
        parts in catalog_strategy(),
        budget in 200u32..4000,
        name in "[a-z]{3,12}",
    ) {
        prop_assume!(name.parse::<UsageProfile>().is_err());
        let recommender = recommender(parts);
        let gaming = recommender.recommend(f64::from(budget), UsageProfile::Gaming);
        prop_assert_eq!(recommender.recommend_for(f64::from(budget), &name), gaming);
    }

    /// Raising the budget never lowers the best score nor loses a build
    #[test]
    fn score_is_monotonic_in_budget(
        parts in catalog_strategy(),
        usage in usage_strategy(),
        mut budgets in prop::collection::vec(200u32..4000, 2..6),
    ) {
        budgets.sort_unstable();
        let recommender = recommender(parts);

        let mut previous: Option<f64> = None;
        for budget in budgets {
            let score = recommender.recommend(f64::from(budget), usage).build.map(|b| b.score);
            if let Some(previous) = previous {
                prop_assert!(score.is_some(), "build lost at budget {}", budget);
                prop_assert!(score.unwrap_or(f64::MIN) >= previous - 1e-9);
            }
            previous = score.or(previous);
        }
    }
}
