//! IO functionality for reading the list of people from a CSV file.
//!
//! The recognized columns are `email` (required, must be unique), `name` (optional, defaults to
//! the local part of the email address), `slack` (optional, not used by this tool) and `notwo`
//! (optional boolean, defaults to false). Every other column is interpreted as a time-slot
//! availability column with boolean cells; the headers of these columns become the slot names
//! in the final report.

use std::collections::HashSet;

use log::{info, warn};
use ndarray::Array2;

use crate::Person;

/// Column names with a fixed meaning, everything else is an availability slot
const RESERVED_COLUMNS: [&str; 4] = ["name", "email", "slack", "notwo"];

/// Read the people (and, if availability columns are present, their availability matrix) from
/// CSV data.
///
/// Returns the list of people, the availability matrix (one row per person, one column per slot;
/// `None` if the file has no availability columns) and the slot names.
///
/// # Errors
///
/// Fails with a string error message to be displayed to the user, if
/// * the file cannot be parsed as CSV,
/// * the `email` column is missing, an email cell is empty or emails are not unique,
/// * a `notwo` or availability cell holds something that is not a boolean value,
/// * the file contains no people at all.
pub fn read<R: std::io::Read>(
    reader: R,
) -> Result<(Vec<Person>, Option<Array2<bool>>, Vec<String>), String> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(|e| e.to_string())?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let email_column = column("email")
        .ok_or("Columns appear to be missing. Expected at least an 'email' column.")?;
    let name_column = column("name");
    let notwo_column = column("notwo");
    let slot_columns: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !RESERVED_COLUMNS.contains(h))
        .map(|(i, _)| i)
        .collect();
    let slot_names: Vec<String> = slot_columns.iter().map(|&i| headers[i].to_string()).collect();

    let mut people: Vec<Person> = Vec::new();
    let mut availability_cells: Vec<bool> = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        let line = index + 2;

        let email = record.get(email_column).unwrap_or("").trim().to_string();
        if email.is_empty() {
            return Err(format!("Line {}: empty email address", line));
        }
        let name = match name_column.and_then(|c| record.get(c)) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => email.split('@').next().unwrap_or(email.as_str()).to_string(),
        };
        let no_two = match notwo_column.and_then(|c| record.get(c)) {
            Some(cell) => parse_flag(cell)
                .map_err(|e| format!("Line {}, column 'notwo': {}", line, e))?,
            None => false,
        };
        for &c in slot_columns.iter() {
            let cell = record.get(c).unwrap_or("");
            availability_cells.push(
                parse_flag(cell)
                    .map_err(|e| format!("Line {}, column '{}': {}", line, &headers[c], e))?,
            );
        }
        people.push(Person {
            index,
            name,
            email,
            no_two,
        });
    }

    if people.is_empty() {
        return Err("No people found in the input file.".to_string());
    }
    let mut seen = HashSet::new();
    for p in people.iter() {
        if !seen.insert(p.email.as_str()) {
            return Err(format!(
                "Emails not unique ({}). Do you have duplicates?",
                p.email
            ));
        }
    }

    let availabilities = if slot_columns.is_empty() {
        None
    } else {
        Some(
            Array2::from_shape_vec((people.len(), slot_columns.len()), availability_cells)
                .map_err(|e| e.to_string())?,
        )
    };

    info!(
        "Loaded {} people. {} people do not want to be in groups of two",
        people.len(),
        people.iter().filter(|p| p.no_two).count()
    );
    if let Some(a) = &availabilities {
        let unavailable = a
            .rows()
            .into_iter()
            .filter(|row| !row.iter().any(|&v| v))
            .count();
        if unavailable > 0 {
            warn!(
                "{} people are not available in any time slot and can never be matched",
                unavailable
            );
        }
    }

    Ok((people, availabilities, slot_names))
}

fn parse_flag(cell: &str) -> Result<bool, String> {
    match cell.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "x" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(format!("'{}' is not a boolean value", other)),
    }
}

#[cfg(test)]
mod test {
    #[test]
    fn parse_default_file() {
        let data = include_bytes!("test_ressources/default.csv");
        let (people, availabilities, slot_names) = super::read(&data[..]).unwrap();

        crate::assert_data_consistency(&people);
        assert_eq!(people.len(), 5);
        assert_eq!(people[0].name, "Alice Amber");
        assert_eq!(people[2].name, "charly", "falls back to the email local part");
        assert_eq!(people[2].email, "charly@example.com");
        let no_two: Vec<bool> = people.iter().map(|p| p.no_two).collect();
        assert_eq!(no_two, vec![false, true, false, false, true]);

        assert_eq!(
            slot_names,
            vec!["tuesday", "wednesday", "thursday"]
        );
        let availabilities = availabilities.unwrap();
        assert_eq!(availabilities.dim(), (5, 3));
        assert_eq!(
            availabilities.row(0).to_vec(),
            vec![true, true, false]
        );
        assert_eq!(
            availabilities.row(3).to_vec(),
            vec![true, true, true]
        );
    }

    #[test]
    fn parse_file_without_availabilities() {
        let data = include_bytes!("test_ressources/minimal.csv");
        let (people, availabilities, slot_names) = super::read(&data[..]).unwrap();

        assert_eq!(people.len(), 3);
        assert_eq!(people[0].name, "a");
        assert!(availabilities.is_none());
        assert!(slot_names.is_empty());
        assert_eq!(people[1].no_two, true);
        assert_eq!(people[2].no_two, false, "empty notwo cells default to false");
    }

    #[test]
    fn reject_missing_email_column() {
        let data = "name,notwo\nAlice,0\n";
        let result = super::read(data.as_bytes());
        assert!(result.unwrap_err().contains("Columns appear to be missing"));
    }

    #[test]
    fn reject_duplicate_emails() {
        let data = "email\na@example.com\na@example.com\n";
        let result = super::read(data.as_bytes());
        assert!(result.unwrap_err().contains("not unique"));
    }

    #[test]
    fn reject_bad_boolean_cells() {
        let data = "email,notwo\na@example.com,maybe\n";
        let result = super::read(data.as_bytes());
        assert!(result.unwrap_err().contains("not a boolean value"));
    }
}
