use std::collections::BTreeMap;

use crate::{
    models::{Build, CandidateSet, Part, PartType, UsageProfile},
    services::profiles::ProfileTables,
};

const SLOTS: usize = PartType::ESSENTIAL.len();

/// Finds the highest-scoring compatible build within budget
///
/// Enumerates every combination of one candidate per essential type, in
/// canonical type order and candidate order. A combination is valid when its
/// total price is within `budget` and the CPU socket equals the motherboard
/// socket. Its score is the sum of part scores weighted by the usage profile.
/// On equal scores the first combination enumerated wins.
///
/// Returns `None` when the candidate set is incomplete or no combination is
/// valid. With at most N candidates per type this visits at most N^7
/// combinations; branches are abandoned as soon as the running price exceeds
/// the budget or the motherboard does not fit the chosen CPU, which does not
/// change the result.
pub fn optimize_build(
    candidates: &CandidateSet,
    tables: &ProfileTables,
    usage: UsageProfile,
    budget: f64,
) -> Option<Build> {
    if !candidates.is_complete() {
        return None;
    }

    let mut search = Search {
        lists: PartType::ESSENTIAL.map(|t| candidates.get(t)),
        weights: PartType::ESSENTIAL.map(|t| tables.synergy_weight(usage, t)),
        budget,
        chosen: [0; SLOTS],
        best: None,
    };
    search.descend(0, 0.0, 0.0);

    let (indices, score) = search.best?;
    let parts: BTreeMap<PartType, Part> = PartType::ESSENTIAL
        .into_iter()
        .zip(indices)
        .enumerate()
        .map(|(slot, (part_type, i))| (part_type, search.lists[slot][i].clone()))
        .collect();

    Some(Build { parts, score })
}

/// CPU and motherboard agree on a present socket
pub fn sockets_match(cpu: &Part, motherboard: &Part) -> bool {
    matches!((cpu.socket(), motherboard.socket()), (Some(a), Some(b)) if a == b)
}

struct Search<'a> {
    lists: [&'a [Part]; SLOTS],
    weights: [f64; SLOTS],
    budget: f64,
    chosen: [usize; SLOTS],
    best: Option<([usize; SLOTS], f64)>,
}

impl Search<'_> {
    fn descend(&mut self, slot: usize, cost: f64, score: f64) {
        if slot == SLOTS {
            if self.best.map_or(true, |(_, best)| score > best) {
                self.best = Some((self.chosen, score));
            }
            return;
        }

        let list = self.lists[slot];
        for (i, part) in list.iter().enumerate() {
            let cost = cost + part.price;
            // Prices are non-negative, so no completion of this branch can fit
            if cost > self.budget {
                continue;
            }
            if PartType::ESSENTIAL[slot] == PartType::Motherboard
                && !sockets_match(self.cpu(), part)
            {
                continue;
            }

            self.chosen[slot] = i;
            self.descend(slot + 1, cost, score + part.score * self.weights[slot]);
        }
    }

    fn cpu(&self) -> &Part {
        &self.lists[0][self.chosen[0]]
    }
}
