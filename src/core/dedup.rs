// HydroFlow Export - core/dedup.rs
//
// Duplicate detection for calculation records. The same calculation is
// often re-run with identical inputs; "all calculations" exports keep only
// the first run of each.

use crate::core::extract::level_index;
use crate::core::model::{CalculationRecord, LevelEntry};
use std::collections::HashSet;

/// Canonical signature of a record: parameters, curve info, and every level
/// message ordered by level index, each followed by `|`.
///
/// Levels are sorted stably, so levels without a parseable index (treated
/// as index 0) keep their relative log order.
pub fn signature(record: &CalculationRecord) -> String {
    let mut levels: Vec<&LevelEntry> = record.levels.iter().collect();
    levels.sort_by_key(|l| level_index(&l.message).unwrap_or(0));

    let mut sig = String::with_capacity(
        record.parameters.len()
            + record.consumption_curve_info.len()
            + levels.iter().map(|l| l.message.len() + 1).sum::<usize>()
            + 2,
    );
    sig.push_str(&record.parameters);
    sig.push('|');
    sig.push_str(&record.consumption_curve_info);
    sig.push('|');
    for level in levels {
        sig.push_str(&level.message);
        sig.push('|');
    }
    sig
}

/// Remove records whose signature was already seen, keeping first-seen order.
pub fn remove_duplicates(records: Vec<CalculationRecord>) -> Vec<CalculationRecord> {
    let total = records.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let unique: Vec<CalculationRecord> = records
        .into_iter()
        .filter(|r| seen.insert(signature(r)))
        .collect();

    tracing::debug!(
        total,
        unique = unique.len(),
        removed = total - unique.len(),
        "Duplicate calculations removed"
    );

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(params: &str, levels: &[&str]) -> CalculationRecord {
        CalculationRecord {
            timestamp: "t".to_string(),
            parameters: params.to_string(),
            consumption_curve_info: String::new(),
            levels: levels
                .iter()
                .map(|m| LevelEntry {
                    message: m.to_string(),
                    timestamp: "t".to_string(),
                })
                .collect(),
            end_message: None,
        }
    }

    #[test]
    fn test_signature_layout() {
        let r = record("P", &["Level 20cm: b", "Level 10cm: a"]);
        assert_eq!(signature(&r), "P||Level 10cm: a|Level 20cm: b|");
    }

    #[test]
    fn test_level_order_does_not_affect_signature() {
        let a = record("P", &["Level 10cm: x", "Level 20cm: y"]);
        let b = record("P", &["Level 20cm: y", "Level 10cm: x"]);
        assert_eq!(signature(&a), signature(&b));
    }

    #[test]
    fn test_unparseable_levels_sort_as_zero_and_stay_stable() {
        let r = record("P", &["Level 5cm: a", "junk two", "junk one"]);
        assert_eq!(signature(&r), "P||junk two|junk one|Level 5cm: a|");
    }

    #[test]
    fn test_timestamps_and_end_message_ignored() {
        let a = record("P", &["Level 10cm: x"]);
        let mut b = a.clone();
        b.timestamp = "later".to_string();
        b.end_message = Some("Chart generated with 1 data points".to_string());
        assert_eq!(remove_duplicates(vec![a, b]).len(), 1);
    }

    #[test]
    fn test_preserves_first_seen_order() {
        let a = record("A", &[]);
        let b = record("B", &[]);
        let c = record("C", &[]);
        let out = remove_duplicates(vec![a.clone(), b.clone(), a, c.clone(), b]);
        let params: Vec<_> = out.iter().map(|r| r.parameters.as_str()).collect();
        assert_eq!(params, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            record("A", &["Level 10cm: x"]),
            record("A", &["Level 10cm: x"]),
            record("A", &["Level 10cm: y"]),
        ];
        let once = remove_duplicates(input);
        let twice = remove_duplicates(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(remove_duplicates(Vec::new()).is_empty());
    }
}
