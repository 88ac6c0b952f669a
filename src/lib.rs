//! Matching of people into discussion groups of two, three or four.
//!
//! The `solver` module decides *how many* groups of each size to form (and how many people have
//! to sit a round out), the `sampler` and `pairup` modules decide *who* ends up together, biased
//! towards groups whose members share as many time slots as possible. The `io` and `seed`
//! modules connect this engine to CSV input, human readable output and reproducible seeding.

pub mod io;
pub mod pairup;
pub mod sampler;
pub mod seed;
pub mod solver;

use std::fmt;

/// Representation of one person taking part in the matching
#[derive(Debug, Clone)]
pub struct Person {
    /// id/index of the person in the list of people. Must match the person's position in that
    /// list, which is also their row in the availability matrix
    pub index: usize,
    /// Person's name. Mainly used for info/debug output and the final group listing
    pub name: String,
    /// Person's email address. Doubles as the unique key of the person
    pub email: String,
    /// True, if this person must not be put into a group of exactly two people
    pub no_two: bool,
}

/// Error kinds of the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The population is too small to form any group of two to four people (or consists of a
    /// single pair that refuses pairing)
    TooFewPeople,
    /// A single sampling step could not find a group with any shared time slot. Recovered
    /// internally by abandoning the affected trial
    IncompatibleAvailabilities,
    /// Not a single trial of the whole search produced a valid grouping
    NoSolution,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TooFewPeople => write!(f, "Too few people to form any group of 2 to 4 people"),
            Error::IncompatibleAvailabilities => {
                write!(f, "No compatible availabilities for the requested group")
            }
            Error::NoSolution => write!(
                f,
                "No valid grouping was found. Consider removing a participant manually."
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Check that the people's `index` fields match their positions in the list.
///
/// All modules of this crate refer to people by their index into the caller's list, so an
/// inconsistent index field would silently scramble the output. Violations are a programming
/// error, thus this panics instead of returning a `Result`.
pub fn assert_data_consistency(people: &[Person]) {
    for (i, p) in people.iter().enumerate() {
        assert_eq!(
            p.index, i,
            "Person at position {} carries the inconsistent index {}",
            i, p.index
        );
    }
}
