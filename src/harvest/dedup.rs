// src/harvest/dedup.rs
use crate::directory::StaffRecord;
use std::collections::HashSet;

/// Drops exact duplicates, keeping the first occurrence of each record.
///
/// Two records are duplicates only if every field matches, absent fields
/// included. The same person seen with a different phone or email stays twice.
pub fn dedup_records(records: Vec<StaffRecord>) -> Vec<StaffRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(record.clone()) {
            unique.push(record);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: Option<u64>) -> StaffRecord {
        StaffRecord {
            name: name.to_string(),
            image_url: format!("https://site.example/img/{}.jpg", name),
            school: "Nordby skole".to_string(),
            role: Some("Lærer".to_string()),
            email: None,
            phone_number: phone,
        }
    }

    #[test]
    fn collapses_to_distinct_in_first_seen_order() {
        let a = record("a", None);
        let b = record("b", Some(1));
        let c = record("c", None);
        let input = vec![
            b.clone(),
            a.clone(),
            b.clone(),
            c.clone(),
            a.clone(),
            b.clone(),
            c.clone(),
        ];

        assert_eq!(dedup_records(input), vec![b, a, c]);
    }

    #[test]
    fn differing_optional_field_is_not_a_duplicate() {
        let with_phone = record("a", Some(12345678));
        let without_phone = record("a", None);

        let unique = dedup_records(vec![with_phone.clone(), without_phone.clone(), with_phone]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1], without_phone);
    }

    #[test]
    fn empty_input() {
        assert!(dedup_records(Vec::new()).is_empty());
    }
}
