use std::sync::Arc;

use crate::{
    models::{Part, PartType, Recommendation, UsageProfile},
    services::{
        catalog::Catalog,
        optimizer::optimize_build,
        profiles::ProfileTables,
        selector::{select_candidates, top_by_score},
    },
};

pub const DEFAULT_CANDIDATE_LIMIT: usize = 5;
pub const DEFAULT_OPTIONS_LIMIT: usize = 10;

/// Recommends complete builds from a shared, read-only catalog
///
/// Cloning is cheap and every method is a pure function of the catalog, the
/// tables and its arguments, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    tables: Arc<ProfileTables>,
    candidate_limit: usize,
}

impl Recommender {
    pub fn new(catalog: Catalog, tables: ProfileTables) -> Self {
        Self {
            catalog: Arc::new(catalog),
            tables: Arc::new(tables),
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }

    /// Sets how many candidates are kept per part type (at least one)
    pub fn with_candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = limit.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn candidate_limit(&self) -> usize {
        self.candidate_limit
    }

    /// Best build for a budget and usage profile, together with the candidates considered
    ///
    /// A budget that is not a positive finite number yields no build and no candidates.
    pub fn recommend(&self, budget: f64, usage: UsageProfile) -> Recommendation {
        if !(budget.is_finite() && budget > 0.0) {
            return Recommendation {
                build: None,
                candidates: Default::default(),
            };
        }

        let candidates = select_candidates(
            &self.catalog,
            &self.tables,
            usage,
            budget,
            self.candidate_limit,
        );
        let build = optimize_build(&candidates, &self.tables, usage, budget);

        Recommendation { build, candidates }
    }

    /// Same as [`recommend`](Self::recommend), resolving unknown usage names to gaming
    pub fn recommend_for(&self, budget: f64, usage: &str) -> Recommendation {
        self.recommend(budget, UsageProfile::from_name_or_default(usage))
    }

    /// Best-scoring parts of one type, optionally capped by price
    pub fn component_options(
        &self,
        part_type: PartType,
        max_price: Option<f64>,
        limit: usize,
    ) -> Vec<Part> {
        let eligible = self
            .catalog
            .of_type(part_type)
            .filter(|p| max_price.map_or(true, |max| p.price <= max));

        top_by_score(eligible, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Part::new(PartType::Cpu, "Ryzen 5 7600", 190.0, 80.0).with_socket("AM5"),
            Part::new(PartType::Cpu, "Core i5-12400F", 150.0, 70.0).with_socket("LGA1700"),
            Part::new(PartType::Motherboard, "B650 Board", 95.0, 50.0).with_socket("AM5"),
            Part::new(PartType::Motherboard, "B760 Board", 90.0, 55.0).with_socket("LGA1700"),
            Part::new(PartType::Memory, "DDR5 32GB", 95.0, 60.0),
            Part::new(PartType::Memory, "DDR5 16GB", 55.0, 40.0),
            Part::new(PartType::InternalHardDrive, "NVMe 1TB", 75.0, 50.0),
            Part::new(PartType::VideoCard, "RTX 4070", 399.0, 90.0),
            Part::new(PartType::VideoCard, "RX 7600", 260.0, 70.0),
            Part::new(PartType::Case, "Mid Tower", 49.0, 30.0),
            Part::new(PartType::PowerSupply, "650W Gold", 69.0, 40.0),
        ])
    }

    fn recommender() -> Recommender {
        Recommender::new(catalog(), ProfileTables::default())
    }

    #[test]
    fn test_recommend_gaming_build() {
        let recommendation = recommender().recommend(1000.0, UsageProfile::Gaming);
        let build = recommendation.build.expect("a build fits in 1000");

        assert_eq!(build.get(PartType::Cpu).unwrap().name, "Ryzen 5 7600");
        assert_eq!(build.get(PartType::Motherboard).unwrap().name, "B650 Board");
        assert_eq!(build.get(PartType::VideoCard).unwrap().name, "RTX 4070");
        assert_eq!(build.total_price(), 972.0);
        assert!(recommendation.candidates.is_complete());
    }

    #[test]
    fn test_unknown_usage_behaves_like_gaming() {
        let recommender = recommender();
        let gaming = recommender.recommend(1000.0, UsageProfile::Gaming);
        let unknown = recommender.recommend_for(1000.0, "crypto_mining");
        assert_eq!(gaming, unknown);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let recommender = recommender();
        let first = recommender.recommend(1500.0, UsageProfile::OfficeWork);
        for _ in 0..5 {
            assert_eq!(recommender.recommend(1500.0, UsageProfile::OfficeWork), first);
        }
    }

    #[test]
    fn test_budget_below_floors_yields_empty_build() {
        let recommendation = recommender().recommend(50.0, UsageProfile::Gaming);
        assert!(recommendation.build.is_none());
        assert!(!recommendation.candidates.is_complete());
        assert!(recommendation
            .candidates
            .missing_types()
            .contains(&PartType::VideoCard));
    }

    #[test]
    fn test_non_positive_budget_yields_nothing() {
        let recommender = recommender();
        for budget in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let recommendation = recommender.recommend(budget, UsageProfile::Gaming);
            assert!(recommendation.build.is_none());
            assert!(recommendation.candidates.is_empty());
        }
    }

    #[test]
    fn test_candidate_limit() {
        let recommender = recommender().with_candidate_limit(1);
        let recommendation = recommender.recommend(3000.0, UsageProfile::Gaming);
        for (_, parts) in recommendation.candidates.iter() {
            assert_eq!(parts.len(), 1);
        }
        assert_eq!(recommender.with_candidate_limit(0).candidate_limit(), 1);
    }

    #[test]
    fn test_component_options() {
        let recommender = recommender();

        let options = recommender.component_options(PartType::VideoCard, None, 10);
        let names: Vec<&str> = options.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["RTX 4070", "RX 7600"]);

        let options = recommender.component_options(PartType::VideoCard, Some(300.0), 10);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "RX 7600");

        let options = recommender.component_options(PartType::Memory, None, 1);
        assert_eq!(options[0].name, "DDR5 32GB");
    }
}
