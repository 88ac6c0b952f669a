//! IO functionality: reading the people CSV and formatting the matching result.

pub mod people;

use std::fmt::Write;

use crate::pairup::PairUpResult;
use crate::Person;

/// Format the found grouping into a human readable String (e.g. to print it to stdout).
///
/// The output format will look like
/// ```text
/// ===== Group 1 =====
/// Alice Amber <alice@example.com>
/// Bob Brown <bob@example.com>
/// possible slots: tuesday, wednesday
/// ```
/// followed by a section listing the people who could not be matched this time. The
/// "possible slots" line is omitted when no availability data was supplied.
pub fn format_groups(result: &PairUpResult, people: &[Person], slot_names: &[String]) -> String {
    let mut output = String::new();
    for (i, group) in result.segmentation.iter().enumerate() {
        write!(output, "\n===== Group {} =====\n", i + 1).unwrap();
        for &p in group.members.iter() {
            write!(output, "{} <{}>\n", people[p].name, people[p].email).unwrap();
        }
        if !slot_names.is_empty() {
            let slots: Vec<&str> = slot_names
                .iter()
                .enumerate()
                .filter(|(s, _)| group.availability[*s])
                .map(|(_, name)| name.as_str())
                .collect();
            write!(output, "possible slots: {}\n", slots.join(", ")).unwrap();
        }
    }
    if !result.removed.is_empty() {
        write!(output, "\n===== Not matched this time =====\n").unwrap();
        for &p in result.removed.iter() {
            write!(output, "{} <{}>\n", people[p].name, people[p].email).unwrap();
        }
    }
    output
}
