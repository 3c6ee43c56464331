//! Left-join of appointments against the candidate roster.

use std::collections::HashMap;

use super::models::{Appointment, Candidate, MergedAppointment};

/// Attach to each appointment the roster entry with the same candidate
/// id. Appointments keep their order and are never dropped; an unknown
/// or empty candidate id just leaves `candidate` empty. When the roster
/// repeats an id the first occurrence wins.
pub fn merge_appointments(
    appointments: Vec<Appointment>,
    roster: Vec<Candidate>,
) -> Vec<MergedAppointment> {
    let mut by_id: HashMap<String, Candidate> = HashMap::with_capacity(roster.len());
    for candidate in roster.into_iter().filter(|c| !c.id.is_empty()) {
        by_id.entry(candidate.id.clone()).or_insert(candidate);
    }

    appointments
        .into_iter()
        .map(|appointment| {
            let candidate = by_id.get(&appointment.candidate_id).cloned();
            // `by_id` has no empty keys, so rows without a candidate stay unmatched
            MergedAppointment {
                appointment,
                candidate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(id: i64, candidate_id: &str) -> Appointment {
        Appointment {
            id,
            candidate_id: candidate_id.to_string(),
            appointment_time: Some("2025-03-10T14:30:00Z".to_string()),
            position_code: None,
        }
    }

    fn candidate(id: &str, first_name: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
        }
    }

    #[test]
    fn it_attaches_matching_candidates() {
        let merged = merge_appointments(
            vec![appointment(1, "c-1"), appointment(2, "c-2")],
            vec![candidate("c-2", "Bob"), candidate("c-1", "Alice")],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].appointment.id, 1);
        assert_eq!(merged[0].candidate.as_ref().unwrap().first_name, "Alice");
        assert_eq!(merged[1].candidate.as_ref().unwrap().first_name, "Bob");
    }

    #[test]
    fn it_keeps_appointments_without_a_candidate() {
        let merged = merge_appointments(vec![appointment(7, "ghost")], vec![candidate("c-1", "Alice")]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].appointment.id, 7);
        assert!(merged[0].candidate.is_none());
    }

    #[test]
    fn it_prefers_the_first_duplicate_roster_entry() {
        let merged = merge_appointments(
            vec![appointment(1, "c-1")],
            vec![candidate("c-1", "First"), candidate("c-1", "Second")],
        );

        assert_eq!(merged[0].candidate.as_ref().unwrap().first_name, "First");
    }

    #[test]
    fn it_never_matches_missing_candidate_ids() {
        let merged = merge_appointments(
            vec![appointment(1, ""), appointment(2, "c-1")],
            vec![candidate("", "Nobody"), candidate("c-1", "Alice")],
        );

        assert!(merged[0].candidate.is_none());
        assert_eq!(merged[1].candidate.as_ref().unwrap().first_name, "Alice");
    }

    #[test]
    fn it_handles_an_empty_roster() {
        let merged = merge_appointments(vec![appointment(1, "c-1"), appointment(2, "c-1")], vec![]);
        assert!(merged.iter().all(|m| m.candidate.is_none()));
    }
}
