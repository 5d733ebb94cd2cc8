use crate::{
    models::{CandidateSet, Part, PartType, UsageProfile},
    services::{catalog::Catalog, profiles::ProfileTables},
};

/// Narrows the catalog to the best affordable parts of every essential type
///
/// For each type the price cap is the usage allocation of `budget`, raised to
/// the type's minimum spend floor. CPUs without a socket are dropped since
/// they can never be checked for compatibility. The `limit` best-scoring parts
/// are kept, ties in catalog order.
///
/// Types with nothing affordable are left out of the returned set; check
/// [`CandidateSet::is_complete`] before optimizing.
pub fn select_candidates(
    catalog: &Catalog,
    tables: &ProfileTables,
    usage: UsageProfile,
    budget: f64,
    limit: usize,
) -> CandidateSet {
    let mut candidates = CandidateSet::new();

    for part_type in PartType::ESSENTIAL {
        let cap = tables.budget_cap(usage, part_type, budget);
        let eligible = catalog
            .of_type(part_type)
            .filter(|p| p.price <= cap)
            .filter(|p| part_type != PartType::Cpu || p.socket().is_some());

        candidates.insert(part_type, top_by_score(eligible, limit));
    }

    candidates
}

/// Best `limit` parts by descending score; the stable sort keeps input order on ties
pub fn top_by_score<'a>(parts: impl Iterator<Item = &'a Part>, limit: usize) -> Vec<Part> {
    let mut ranked: Vec<&Part> = parts.collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(parts: &[Part]) -> Vec<&str> {
        parts.iter().map(|p| p.name.as_str()).collect()
    }

    fn full_catalog() -> Vec<Part> {
        vec![
            Part::new(PartType::Cpu, "Ryzen 5 7600", 190.0, 80.0).with_socket("AM5"),
            Part::new(PartType::Motherboard, "B650", 95.0, 50.0).with_socket("AM5"),
            Part::new(PartType::Memory, "DDR5 32GB", 95.0, 60.0),
            Part::new(PartType::InternalHardDrive, "NVMe 1TB", 75.0, 50.0),
            Part::new(PartType::VideoCard, "RTX 4070", 399.0, 90.0),
            Part::new(PartType::Case, "Mid Tower", 49.0, 30.0),
            Part::new(PartType::PowerSupply, "650W Gold", 69.0, 40.0),
        ]
    }

    #[test]
    fn test_complete_selection() {
        let catalog = Catalog::new(full_catalog());
        let candidates = select_candidates(
            &catalog,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            1000.0,
            5,
        );

        assert!(candidates.is_complete());
        assert_eq!(names(candidates.get(PartType::VideoCard)), vec!["RTX 4070"]);
    }

    #[test]
    fn test_cap_excludes_expensive_parts() {
        let mut parts = full_catalog();
        parts.push(Part::new(PartType::VideoCard, "RTX 4090", 1599.0, 150.0));
        let catalog = Catalog::new(parts);

        // Gaming video card cap at 1000 is 400
        let candidates = select_candidates(
            &catalog,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            1000.0,
            5,
        );
        assert_eq!(names(candidates.get(PartType::VideoCard)), vec!["RTX 4070"]);
    }

    #[test]
    fn test_minimum_spend_floor_overrides_small_allocation() {
        let catalog = Catalog::new(vec![Part::new(PartType::Case, "Budget Case", 44.0, 10.0)]);

        // 200 * 0.05 = 10, but the case floor is 45
        let candidates = select_candidates(
            &catalog,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            200.0,
            5,
        );
        assert_eq!(names(candidates.get(PartType::Case)), vec!["Budget Case"]);
    }

    #[test]
    fn test_cpu_without_socket_is_dropped() {
        let catalog = Catalog::new(vec![
            Part::new(PartType::Cpu, "Mystery", 120.0, 99.0),
            Part::new(PartType::Cpu, "Blank Socket", 120.0, 98.0).with_socket(""),
            Part::new(PartType::Cpu, "Core i5-12400F", 150.0, 70.0).with_socket("LGA1700"),
            Part::new(PartType::Motherboard, "No Socket Board", 90.0, 40.0),
        ]);

        let candidates = select_candidates(
            &catalog,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            1000.0,
            5,
        );

        assert_eq!(names(candidates.get(PartType::Cpu)), vec!["Core i5-12400F"]);
        // Only CPUs are filtered on socket presence
        assert_eq!(
            names(candidates.get(PartType::Motherboard)),
            vec!["No Socket Board"]
        );
    }

    #[test]
    fn test_top_n_by_score_with_stable_ties() {
        let catalog = Catalog::new(vec![
            Part::new(PartType::Memory, "a", 50.0, 10.0),
            Part::new(PartType::Memory, "b", 50.0, 30.0),
            Part::new(PartType::Memory, "c", 50.0, 20.0),
            Part::new(PartType::Memory, "d", 50.0, 30.0),
            Part::new(PartType::Memory, "e", 50.0, 20.0),
        ]);

        let candidates = select_candidates(
            &catalog,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            1000.0,
            3,
        );
        assert_eq!(names(candidates.get(PartType::Memory)), vec!["b", "d", "c"]);
    }

    #[test]
    fn test_missing_types_reported() {
        let catalog = Catalog::new(full_catalog());

        // At 300 every cap falls back to its floor and only the cheap case fits
        let mut parts = full_catalog();
        parts.push(Part::new(PartType::Case, "Tiny Case", 40.0, 5.0));
        let catalog_with_cheap_case = Catalog::new(parts);
        let candidates = select_candidates(
            &catalog_with_cheap_case,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            300.0,
            5,
        );

        assert!(!candidates.is_complete());
        let missing = candidates.missing_types();
        assert!(missing.contains(&PartType::Cpu));
        assert!(missing.contains(&PartType::VideoCard));
        assert!(!missing.contains(&PartType::Case));
        assert_eq!(names(candidates.get(PartType::Case)), vec!["Tiny Case"]);

        // Nothing survives at all when every part is above its floor
        let candidates = select_candidates(
            &catalog,
            &ProfileTables::default(),
            UsageProfile::Gaming,
            100.0,
            5,
        );
        assert_eq!(candidates.missing_types(), PartType::ESSENTIAL.to_vec());
        assert!(candidates.is_empty());
    }
}
