use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::{PartType, UsageProfile};

type PartTable = BTreeMap<PartType, f64>;

/// Hand-tuned lookup tables that shape candidate selection and build scoring
///
/// Allocation fractions are independent per-type caps, not a partition of the
/// budget, so they need not sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTables {
    /// Fraction of the total budget nominally reserved for each type
    pub allocations: BTreeMap<UsageProfile, PartTable>,
    /// Score multiplier per type when scoring a complete build
    pub synergy_weights: BTreeMap<UsageProfile, PartTable>,
    /// Absolute price floor for the per-type cap, independent of usage
    pub minimum_spend: PartTable,
}

fn table(entries: [(PartType, f64); 7]) -> PartTable {
    entries.into_iter().collect()
}

impl Default for ProfileTables {
    fn default() -> Self {
        use PartType::*;
        use UsageProfile::*;

        let allocations = BTreeMap::from([
            (
                Gaming,
                table([
                    (Cpu, 0.20),
                    (VideoCard, 0.40),
                    (Motherboard, 0.10),
                    (Memory, 0.10),
                    (InternalHardDrive, 0.08),
                    (PowerSupply, 0.07),
                    (Case, 0.05),
                ]),
            ),
            (
                Design,
                table([
                    (Cpu, 0.30),
                    (VideoCard, 0.25),
                    (Motherboard, 0.10),
                    (Memory, 0.15),
                    (InternalHardDrive, 0.10),
                    (PowerSupply, 0.05),
                    (Case, 0.05),
                ]),
            ),
            (
                VideoEditing,
                table([
                    (Cpu, 0.35),
                    (VideoCard, 0.25),
                    (Motherboard, 0.05),
                    (Memory, 0.20),
                    (InternalHardDrive, 0.10),
                    (PowerSupply, 0.03),
                    (Case, 0.02),
                ]),
            ),
            (
                OfficeWork,
                table([
                    (Cpu, 0.25),
                    (VideoCard, 0.10),
                    (Motherboard, 0.15),
                    (Memory, 0.15),
                    (InternalHardDrive, 0.20),
                    (PowerSupply, 0.05),
                    (Case, 0.10),
                ]),
            ),
        ]);

        let synergy_weights = BTreeMap::from([
            (
                Gaming,
                table([
                    (Cpu, 0.8),
                    (VideoCard, 1.2),
                    (Memory, 1.0),
                    (InternalHardDrive, 1.0),
                    (Motherboard, 1.0),
                    (PowerSupply, 1.0),
                    (Case, 1.0),
                ]),
            ),
            (
                Design,
                table([
                    (Cpu, 1.2),
                    (VideoCard, 0.8),
                    (Memory, 1.1),
                    (InternalHardDrive, 1.0),
                    (Motherboard, 1.0),
                    (PowerSupply, 1.0),
                    (Case, 1.0),
                ]),
            ),
            (
                VideoEditing,
                table([
                    (Cpu, 1.2),
                    (VideoCard, 1.0),
                    (Memory, 1.1),
                    (InternalHardDrive, 1.0),
                    (Motherboard, 1.0),
                    (PowerSupply, 1.0),
                    (Case, 1.0),
                ]),
            ),
            (
                OfficeWork,
                table([
                    (Cpu, 1.1),
                    (VideoCard, 0.7),
                    (Memory, 1.0),
                    (InternalHardDrive, 1.2),
                    (Motherboard, 1.0),
                    (PowerSupply, 1.0),
                    (Case, 1.0),
                ]),
            ),
        ]);

        let minimum_spend = table([
            (Cpu, 100.0),
            (Motherboard, 85.0),
            (Memory, 40.0),
            (InternalHardDrive, 40.0),
            (VideoCard, 150.0),
            (PowerSupply, 50.0),
            (Case, 45.0),
        ]);

        Self {
            allocations,
            synergy_weights,
            minimum_spend,
        }
    }
}

impl ProfileTables {
    /// Loads tables from a JSON file and checks every value is a finite, non-negative number
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let tables: ProfileTables = serde_json::from_str(raw)?;
        tables.validate()?;
        Ok(tables)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let usage_values = self
            .allocations
            .values()
            .chain(self.synergy_weights.values())
            .flat_map(|t| t.values());

        if let Some(bad) = usage_values
            .chain(self.minimum_spend.values())
            .find(|v| !v.is_finite() || **v < 0.0)
        {
            anyhow::bail!("Profile table value out of range: {}", bad);
        }
        if !self.allocations.contains_key(&UsageProfile::Gaming) {
            anyhow::bail!("Profile tables must define the gaming allocation table");
        }
        Ok(())
    }

    /// Budget fraction for a type; profiles without a table use gaming's, absent types get 0.0
    pub fn allocation(&self, usage: UsageProfile, part_type: PartType) -> f64 {
        self.allocations
            .get(&usage)
            .or_else(|| self.allocations.get(&UsageProfile::Gaming))
            .and_then(|t| t.get(&part_type))
            .copied()
            .unwrap_or(0.0)
    }

    /// Score multiplier for a type; profiles without a table use gaming's, absent types get 1.0
    pub fn synergy_weight(&self, usage: UsageProfile, part_type: PartType) -> f64 {
        self.synergy_weights
            .get(&usage)
            .or_else(|| self.synergy_weights.get(&UsageProfile::Gaming))
            .and_then(|t| t.get(&part_type))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn minimum_spend(&self, part_type: PartType) -> f64 {
        self.minimum_spend.get(&part_type).copied().unwrap_or(0.0)
    }

    /// Price cap for candidates of a type: the allocated share, raised to the minimum spend floor
    pub fn budget_cap(&self, usage: UsageProfile, part_type: PartType, budget: f64) -> f64 {
        (budget * self.allocation(usage, part_type)).max(self.minimum_spend(part_type))
    }
}
