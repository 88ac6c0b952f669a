//! Randomized sampling of a single group, biased towards a large shared availability.
//!
//! The sampler draws one group of a requested size from the eligible part of the population. It
//! seeds the group with one of the people who have the fewest available time slots (they have
//! the fewest future opportunities to be placed) and then grows the group one member at a time,
//! preferring candidates whose availability overlaps the group's running joint availability.
//! All randomness comes from the caller's generator, so a fixed seed reproduces the same draws.

use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::Error;

/// Tuning constants of the weighted growth step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Cap for the overlap part of a candidate's selection weight. Overlaps beyond this count do
    /// not increase the candidate's chance any further
    pub max_joint_boost: usize,
    /// Offset added to the candidate's own availability count in the weight's denominator.
    /// Dampens the preference for highly available people, who remain easy to place later
    pub wasted_resource_offset: usize,
}

impl Default for SamplerConfig {
    fn default() -> SamplerConfig {
        SamplerConfig {
            max_joint_boost: 5,
            wasted_resource_offset: 3,
        }
    }
}

/// Selection weight of one candidate for the next place in the group
fn selection_weight(overlap: usize, own_availability: usize, config: &SamplerConfig) -> f64 {
    overlap.min(config.max_joint_boost) as f64
        / (config.wasted_resource_offset + own_availability) as f64
}

/// Draw one group of `n` people from the eligible part of the population.
///
/// `eligible` masks the people that may still be chosen. If `availabilities` is given, each row
/// holds one person's availability over the time slots; without it every person counts as
/// available in a single universal slot, which makes the weighted selection below collapse to
/// uniform sampling. Returns the chosen people (in the order they were drawn) together with the
/// group's joint availability, i.e. the slot-wise AND of all members' rows.
///
/// A group size of zero is a no-op and yields an empty group with an all-true availability.
///
/// # Errors
///
/// Fails with `Error::IncompatibleAvailabilities` if no eligible person with a nonzero
/// availability is left to seed the group, or if at some growth step no remaining candidate
/// shares a slot with the group (this includes simply running out of eligible people).
pub fn sample<R: Rng + ?Sized>(
    eligible: &Array1<bool>,
    n: usize,
    availabilities: Option<&Array2<bool>>,
    config: &SamplerConfig,
    rng: &mut R,
) -> Result<(Vec<usize>, Array1<bool>), Error> {
    let n_people = eligible.len();

    let universal;
    let availabilities = match availabilities {
        Some(a) => {
            assert_eq!(
                a.nrows(),
                n_people,
                "Availability matrix has {} rows for {} people",
                a.nrows(),
                n_people
            );
            a
        }
        None => {
            universal = Array2::from_elem((n_people, 1), true);
            &universal
        }
    };

    if n == 0 {
        return Ok((
            Vec::new(),
            Array1::from_elem(availabilities.ncols(), true),
        ));
    }

    let availability_count: Vec<usize> = (0..n_people)
        .map(|p| availabilities.row(p).iter().filter(|&&a| a).count())
        .collect();

    // Seed selection: scarce availability first. People without any available slot can never
    // share one with a group, so they are not considered at all.
    let mut pool: Vec<usize> = (0..n_people)
        .filter(|&p| eligible[p] && availability_count[p] > 0)
        .collect();
    let min_count = pool
        .iter()
        .map(|&p| availability_count[p])
        .min()
        .ok_or(Error::IncompatibleAvailabilities)?;
    let seeds: Vec<usize> = pool
        .iter()
        .copied()
        .filter(|&p| availability_count[p] == min_count)
        .collect();
    let seed = seeds[rng.gen_range(0..seeds.len())];
    pool.retain(|&p| p != seed);

    let mut members = vec![seed];
    let mut joint = availabilities.row(seed).to_owned();

    // Iterative growth: weight the remaining candidates by their overlap with the group's
    // running joint availability, discounted by their own availability count.
    while members.len() < n {
        let weights: Vec<f64> = pool
            .iter()
            .map(|&p| {
                let overlap = joint
                    .iter()
                    .zip(availabilities.row(p))
                    .filter(|(j, a)| **j && **a)
                    .count();
                selection_weight(overlap, availability_count[p], config)
            })
            .collect();
        let distribution =
            WeightedIndex::new(&weights).map_err(|_| Error::IncompatibleAvailabilities)?;
        let chosen = pool.remove(distribution.sample(rng));
        for (j, &a) in joint.iter_mut().zip(availabilities.row(chosen)) {
            *j = *j && a;
        }
        members.push(chosen);
    }

    Ok((members, joint))
}

#[cfg(test)]
mod test {
    use super::{sample, selection_weight, SamplerConfig};
    use crate::Error;
    use assert_float_eq::assert_f64_near;
    use ndarray::{array, Array1};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn weight_formula() {
        let config = SamplerConfig::default();
        assert_f64_near!(selection_weight(2, 4, &config), 2.0 / 7.0);
        // Overlaps are capped at max_joint_boost
        assert_f64_near!(selection_weight(9, 4, &config), 5.0 / 7.0);
        assert_f64_near!(selection_weight(0, 1, &config), 0.0);
        let config = SamplerConfig {
            max_joint_boost: 1,
            wasted_resource_offset: 0,
        };
        assert_f64_near!(selection_weight(3, 2, &config), 0.5);
    }

    #[test]
    fn empty_group_is_a_noop() {
        let eligible = Array1::from_elem(3, true);
        let mut rng = StdRng::seed_from_u64(1);
        let (members, joint) =
            sample(&eligible, 0, None, &SamplerConfig::default(), &mut rng).unwrap();
        assert!(members.is_empty());
        assert!(joint.iter().all(|&a| a));
    }

    #[test]
    fn uniform_without_availabilities() {
        let eligible = Array1::from_elem(6, true);
        let mut rng = StdRng::seed_from_u64(42);
        let (members, joint) =
            sample(&eligible, 4, None, &SamplerConfig::default(), &mut rng).unwrap();
        assert_eq!(members.len(), 4);
        let mut sorted = members.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4, "members {:?} are not distinct", members);
        assert!(members.iter().all(|&p| p < 6));
        // The universal slot is shared by everyone
        assert_eq!(joint, array![true]);
    }

    #[test]
    fn respects_the_eligibility_mask() {
        let eligible = Array1::from(vec![true, false, true, false, true, false]);
        let mut rng = StdRng::seed_from_u64(3);
        let (mut members, _) =
            sample(&eligible, 3, None, &SamplerConfig::default(), &mut rng).unwrap();
        members.sort_unstable();
        assert_eq!(members, vec![0, 2, 4]);
    }

    #[test]
    fn scarce_person_seeds_the_group() {
        // Person 2 has a single available slot, everybody else has more, so person 2 must seed
        // every sampled group and the joint availability shrinks to that slot.
        let availabilities = array![
            [true, true, false],
            [true, true, true],
            [false, true, false],
            [true, true, true],
        ];
        let eligible = Array1::from_elem(4, true);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (members, joint) = sample(
                &eligible,
                2,
                Some(&availabilities),
                &SamplerConfig::default(),
                &mut rng,
            )
            .unwrap();
            assert_eq!(members[0], 2);
            assert_eq!(members.len(), 2);
            assert_eq!(joint, array![false, true, false]);
        }
    }

    #[test]
    fn incompatible_when_nobody_shares_a_slot() {
        let availabilities = array![[true, false], [false, true]];
        let eligible = Array1::from_elem(2, true);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            sample(
                &eligible,
                2,
                Some(&availabilities),
                &SamplerConfig::default(),
                &mut rng
            ),
            Err(Error::IncompatibleAvailabilities)
        );
    }

    #[test]
    fn incompatible_when_nobody_has_a_slot_at_all() {
        let availabilities = array![[false, false], [false, false]];
        let eligible = Array1::from_elem(2, true);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            sample(
                &eligible,
                1,
                Some(&availabilities),
                &SamplerConfig::default(),
                &mut rng
            ),
            Err(Error::IncompatibleAvailabilities)
        );
    }

    #[test]
    fn incompatible_when_too_few_people_are_eligible() {
        let eligible = Array1::from_elem(3, true);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            sample(&eligible, 4, None, &SamplerConfig::default(), &mut rng),
            Err(Error::IncompatibleAvailabilities)
        );
    }
}
