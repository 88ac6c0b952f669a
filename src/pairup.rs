//! The randomized assignment search: choosing who ends up in which group.
//!
//! One *trial* partitions the whole population into the groups prescribed by a
//! `solver::SolutionNumbers`: the removed people are sampled first (the sampler's scarcity-first
//! seeding makes it prefer the people with the fewest remaining opportunities), then the groups
//! are carved out in increasing size order, keeping people who refuse groups of two out of the
//! pairs. Every trial is scored by a cost histogram over the groups' joint availability sizes,
//! compared lexicographically, so avoiding groups without any common slot always outranks making
//! good groups even better. Trials that are already worse than the best known one are abandoned
//! early, and the search stops once the best cost has been stable for a while.

use log::debug;
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::Serialize;

use crate::sampler::{sample, SamplerConfig};
use crate::solver::SolutionNumbers;
use crate::Error;

/// Cost of one trial: a histogram over joint availability sizes, where `cost[k]` counts the
/// groups (and, at `k == 0`, the removed people) that ended up with exactly `k` shared slots.
/// Smaller is better; comparison is lexicographic from the zero-overlap bucket upwards.
pub type CostVector = Vec<u32>;

/// One formed discussion group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Indexes of the group's members, in ascending order
    pub members: Vec<usize>,
    /// Slot-wise AND of the members' availabilities: the slots in which the whole group could
    /// meet
    pub availability: Array1<bool>,
}

impl Group {
    /// Number of slots in which all members of the group are available
    pub fn joint_slots(&self) -> usize {
        self.availability.iter().filter(|&&a| a).count()
    }
}

/// Result of the assignment search: the formed groups and the people who sit this round out
#[derive(Debug, Clone, PartialEq)]
pub struct PairUpResult {
    pub segmentation: Vec<Group>,
    /// Indexes of the removed people, in ascending order
    pub removed: Vec<usize>,
}

/// Diagnostic data of one search run, for logging and telemetry. Not relevant for the
/// correctness of the returned grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    /// Cost vectors of all completed trials, in the order they were run
    pub costs: Vec<CostVector>,
    /// Cost vector of the winning trial
    pub best: CostVector,
}

/// Bounds and tuning constants of the trial loop
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Hard upper bound for the number of attempted trials
    pub max_trials: usize,
    /// Stop after this many consecutive trials that failed to improve the best cost
    pub stable_trial_limit: usize,
    /// Constants of the per-group sampling step
    pub sampler: SamplerConfig,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            max_trials: 1000,
            stable_trial_limit: 100,
            sampler: SamplerConfig::default(),
        }
    }
}

enum TrialFailure {
    /// A sampling step ran out of compatible candidates
    Incompatible,
    /// The partial cost already compared worse than the best completed trial
    Bounded,
}

/// Search an assignment of concrete people to the groups prescribed by `sn`.
///
/// `no_two` flags the people who must not be placed in a group of two; its length defines the
/// population size. `availabilities` optionally holds one row of time-slot flags per person.
/// The search runs up to `config.max_trials` randomized trials (exactly one if there is no
/// availability data, since all completed trials would cost the same) and returns the best
/// grouping found together with the cost statistics of all completed trials.
///
/// The caller's `rng` is the only source of randomness, so results are reproducible for a fixed
/// seed. The input collections are never mutated.
///
/// # Errors
///
/// Fails with `Error::NoSolution` if not a single trial produced a complete grouping.
pub fn pair_up<R: Rng + ?Sized>(
    sn: &SolutionNumbers,
    no_two: &Array1<bool>,
    availabilities: Option<&Array2<bool>>,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<(PairUpResult, Statistics), Error> {
    assert_eq!(
        sn.n_people(),
        no_two.len(),
        "Solution numbers cover {} people, but {} were supplied",
        sn.n_people(),
        no_two.len()
    );
    if let Some(a) = availabilities {
        assert_eq!(
            a.nrows(),
            no_two.len(),
            "Availability matrix has {} rows for {} people",
            a.nrows(),
            no_two.len()
        );
    }

    let n_slots = availabilities.map_or(1, |a| a.ncols());
    let max_trials = if availabilities.is_some() {
        config.max_trials
    } else {
        1
    };

    let mut best: Option<(PairUpResult, CostVector)> = None;
    let mut costs: Vec<CostVector> = Vec::new();
    let mut unimproved = 0;
    for trial in 0..max_trials {
        let outcome = run_trial(
            sn,
            no_two,
            availabilities,
            n_slots,
            config,
            best.as_ref().map(|(_, cost)| cost),
            rng,
        );
        match outcome {
            Ok((result, cost)) => {
                costs.push(cost.clone());
                let improved = match &best {
                    None => true,
                    Some((_, best_cost)) => cost < *best_cost,
                };
                if improved {
                    debug!("Trial {} improved the best cost to {:?}", trial, cost);
                    best = Some((result, cost));
                    unimproved = 0;
                } else {
                    unimproved += 1;
                }
            }
            Err(TrialFailure::Incompatible) => {
                debug!("Trial {} ran into incompatible availabilities", trial);
                unimproved += 1;
            }
            Err(TrialFailure::Bounded) => {
                debug!("Trial {} abandoned, already worse than the best cost", trial);
                unimproved += 1;
            }
        }
        if unimproved >= config.stable_trial_limit {
            debug!(
                "Best cost stable for {} trials, stopping the search",
                unimproved
            );
            break;
        }
    }

    match best {
        Some((result, cost)) => Ok((result, Statistics { costs, best: cost })),
        None => Err(Error::NoSolution),
    }
}

/// Run one full trial: remove people first, then carve out all groups in increasing size order.
fn run_trial<R: Rng + ?Sized>(
    sn: &SolutionNumbers,
    no_two: &Array1<bool>,
    availabilities: Option<&Array2<bool>>,
    n_slots: usize,
    config: &SearchConfig,
    best_cost: Option<&CostVector>,
    rng: &mut R,
) -> Result<(PairUpResult, CostVector), TrialFailure> {
    let n_people = no_two.len();
    let mut eligible = Array1::from_elem(n_people, true);
    let mut cost: CostVector = vec![0; n_slots + 1];
    // Removed people are costed like a group without any shared slot.
    cost[0] = sn.removed as u32;

    let (mut removed, _) = sample(&eligible, sn.removed, availabilities, &config.sampler, rng)
        .map_err(|_| TrialFailure::Incompatible)?;
    for &p in removed.iter() {
        eligible[p] = false;
    }

    let mut segmentation = Vec::new();
    let group_counts = [sn.partitions.0, sn.partitions.1, sn.partitions.2];
    for (i, &n_groups) in group_counts.iter().enumerate() {
        let group_size = i + 2;
        for _ in 0..n_groups {
            // People refusing groups of two are not available as pair partners.
            let pool = if group_size == 2 {
                let mut pool = eligible.clone();
                for (p, &flag) in no_two.iter().enumerate() {
                    if flag {
                        pool[p] = false;
                    }
                }
                pool
            } else {
                eligible.clone()
            };
            let (mut members, availability) =
                sample(&pool, group_size, availabilities, &config.sampler, rng)
                    .map_err(|_| TrialFailure::Incompatible)?;
            for &p in members.iter() {
                eligible[p] = false;
            }
            members.sort_unstable();
            let group = Group {
                members,
                availability,
            };
            cost[group.joint_slots()] += 1;
            segmentation.push(group);

            // The histogram entries only ever grow, so a partial trial that already compares
            // worse than the best completed one can never catch up again.
            if let Some(best) = best_cost {
                if cost > *best {
                    return Err(TrialFailure::Bounded);
                }
            }
        }
    }

    let leftover: Vec<usize> = eligible
        .iter()
        .enumerate()
        .filter(|(_, &e)| e)
        .map(|(p, _)| p)
        .collect();
    assert!(
        leftover.is_empty(),
        "People {:?} were left over after a complete trial",
        leftover
    );

    removed.sort_unstable();
    Ok((
        PairUpResult {
            segmentation,
            removed,
        },
        cost,
    ))
}
