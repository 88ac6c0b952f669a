//! The numeric part of the matching: deciding how many groups of each size to form.
//!
//! Given only the population size and the number of people refusing groups of two, `solve()`
//! computes a partition of the population into groups of two, three and four, removing people
//! only if no exact partition exists. Which concrete people end up in which group is decided
//! later by the randomized search in the `pairup` module.
//!
//! This is a complete micro-case analysis for the sizes 2 to 8 plus a recursion that peels off
//! one group of three per step, not a general integer partition solver. It terminates for every
//! input because each recursion step strictly decreases the population size by three and the
//! base cases cover all remainders.

use crate::Error;

/// Invariant description of one matching problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemStatement {
    /// Total number of people to be grouped
    pub n_people: usize,
    /// The number of people who do not want to be in a group of two
    pub n_notwo: usize,
}

impl ProblemStatement {
    pub fn new(n_people: usize, n_notwo: usize) -> ProblemStatement {
        assert!(
            n_notwo <= n_people,
            "{} people refuse groups of two, but there are only {} people",
            n_notwo,
            n_people
        );
        ProblemStatement { n_people, n_notwo }
    }
}

/// Number of groups of each size plus the number of removed people, as computed by `solve()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionNumbers {
    /// Number of groups of two, three and four people
    pub partitions: (usize, usize, usize),
    /// Number of people who cannot be grouped and have to be removed from the matching
    pub removed: usize,
}

impl SolutionNumbers {
    /// Total number of people covered by these numbers, including the removed people
    pub fn n_people(&self) -> usize {
        2 * self.partitions.0 + 3 * self.partitions.1 + 4 * self.partitions.2 + self.removed
    }
}

/// Compute how many groups of two, three and four to form for the given problem.
///
/// The result is deterministic and covers the whole population: the sum of all group sizes plus
/// the number of removed people always equals `ps.n_people`. People are only removed when no
/// exact partition exists, which happens for a population of five in which the group of two
/// cannot be staffed with people accepting it.
///
/// # Errors
///
/// Fails with `Error::TooFewPeople` for populations of less than two people and for a population
/// of exactly two where at least one person refuses groups of two.
pub fn solve(ps: ProblemStatement) -> Result<SolutionNumbers, Error> {
    assert!(
        ps.n_notwo <= ps.n_people,
        "Inconsistent problem statement: {:?}",
        ps
    );
    let s = solve_parts(ps)?;
    assert_eq!(
        s.n_people(),
        ps.n_people,
        "Solution {:?} does not cover all {} people",
        s,
        ps.n_people
    );
    Ok(s)
}

fn solve_parts(ps: ProblemStatement) -> Result<SolutionNumbers, Error> {
    let numbers = |partitions, removed| SolutionNumbers { partitions, removed };
    match ps.n_people {
        0 | 1 => Err(Error::TooFewPeople),
        2 => {
            if ps.n_notwo > 0 {
                // A lone pair that refuses pairing has no valid grouping.
                Err(Error::TooFewPeople)
            } else {
                Ok(numbers((1, 0, 0), 0))
            }
        }
        3 => Ok(numbers((0, 1, 0), 0)),
        4 => Ok(numbers((0, 0, 1), 0)),
        5 => {
            if ps.n_notwo <= 3 {
                // The group of three absorbs up to three refusers, leaving two people for the
                // pair.
                Ok(numbers((1, 1, 0), 0))
            } else {
                Ok(numbers((0, 0, 1), 1))
            }
        }
        6 => Ok(numbers((0, 2, 0), 0)),
        7 => Ok(numbers((0, 1, 1), 0)),
        8 => Ok(numbers((0, 0, 2), 0)),
        n => {
            let s = solve_parts(ProblemStatement {
                n_people: n - 3,
                n_notwo: ps.n_notwo.saturating_sub(3),
            })?;
            // Removals may only ever happen at the smallest remainder, never somewhere in the
            // middle of the recursion.
            assert_eq!(s.removed, 0, "Unexpected removal in sub-solution {:?}", s);
            Ok(numbers(
                (s.partitions.0, s.partitions.1 + 1, s.partitions.2),
                0,
            ))
        }
    }
}
