//! Diff a parent's persisted children against a submitted child list.
//!
//! Children are matched on their natural key within the parent (the ingredient
//! they reference). The planner is storage-agnostic; callers apply the plan
//! inside a single transaction.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// What has to happen to make the persisted children match a submission
#[derive(Debug)]
pub struct ReconcilePlan<E, P> {
    /// Existing children paired with the payload that updates them, in submission order
    pub to_update: Vec<(E, P)>,
    /// Payloads with no existing child, in submission order
    pub to_create: Vec<P>,
    /// Existing children absent from the submission, in persisted order
    pub to_delete: Vec<E>,
}

impl<E, P> ReconcilePlan<E, P> {
    pub fn is_noop(&self) -> bool {
        self.to_update.is_empty() && self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Returns the first key that appears more than once in `submitted`
pub fn find_duplicate_key<P, K, F>(submitted: &[P], key: F) -> Option<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&P) -> K,
{
    let mut seen = HashSet::with_capacity(submitted.len());
    submitted
        .iter()
        .map(key)
        .find(|candidate| !seen.insert(candidate.clone()))
}

/// Plan the update/create/delete sets.
///
/// Submissions must be free of duplicate keys (see [`find_duplicate_key`]);
/// a repeated key would otherwise be planned as a second create.
pub fn plan<E, P, K, FE, FP>(
    existing: Vec<E>,
    submitted: Vec<P>,
    existing_key: FE,
    submitted_key: FP,
) -> ReconcilePlan<E, P>
where
    K: Eq + Hash,
    FE: Fn(&E) -> K,
    FP: Fn(&P) -> K,
{
    let index: HashMap<K, usize> = existing
        .iter()
        .enumerate()
        .map(|(position, child)| (existing_key(child), position))
        .collect();
    let mut slots: Vec<Option<E>> = existing.into_iter().map(Some).collect();

    let mut to_update = Vec::new();
    let mut to_create = Vec::new();
    for payload in submitted {
        let matched = index
            .get(&submitted_key(&payload))
            .and_then(|&position| slots[position].take());
        match matched {
            Some(child) => to_update.push((child, payload)),
            None => to_create.push(payload),
        }
    }

    ReconcilePlan {
        to_update,
        to_create,
        to_delete: slots.into_iter().flatten().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        id: i32,
        ingredient: &'static str,
        quantity: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Payload {
        ingredient: &'static str,
        quantity: Option<u32>,
    }

    fn line(id: i32, ingredient: &'static str, quantity: u32) -> Line {
        Line {
            id,
            ingredient,
            quantity,
        }
    }

    fn payload(ingredient: &'static str, quantity: u32) -> Payload {
        Payload {
            ingredient,
            quantity: Some(quantity),
        }
    }

    #[test]
    fn test_update_create_and_delete_sets() {
        let existing = vec![line(1, "A", 10), line(2, "B", 5)];
        let submitted = vec![payload("A", 12), payload("C", 3)];

        let plan = plan(existing, submitted, |l| l.ingredient, |p| p.ingredient);

        assert_eq!(plan.to_update, vec![(line(1, "A", 10), payload("A", 12))]);
        assert_eq!(plan.to_create, vec![payload("C", 3)]);
        assert_eq!(plan.to_delete, vec![line(2, "B", 5)]);
    }

    #[test]
    fn test_empty_existing_creates_everything() {
        let submitted = vec![payload("A", 1), payload("B", 2)];
        let plan = plan(Vec::<Line>::new(), submitted.clone(), |l| l.ingredient, |p| p.ingredient);

        assert!(plan.to_update.is_empty());
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.to_create, submitted);
    }

    #[test]
    fn test_empty_submission_deletes_everything() {
        let existing = vec![line(1, "A", 10), line(2, "B", 5)];
        let plan = plan(existing.clone(), Vec::<Payload>::new(), |l| l.ingredient, |p| p.ingredient);

        assert_eq!(plan.to_delete, existing);
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_identical_submission_only_updates() {
        let existing = vec![line(1, "A", 10), line(2, "B", 5)];
        let submitted = vec![payload("B", 5), payload("A", 10)];
        let plan = plan(existing, submitted, |l| l.ingredient, |p| p.ingredient);

        assert_eq!(plan.to_update.len(), 2);
        // Submission order is preserved
        assert_eq!(plan.to_update[0].0.ingredient, "B");
        assert!(plan.to_create.is_empty());
        assert!(plan.to_delete.is_empty());
    }

    #[test]
    fn test_find_duplicate_key() {
        let clean = vec![payload("A", 1), payload("B", 2)];
        assert_eq!(find_duplicate_key(&clean, |p| p.ingredient), None);

        let duplicated = vec![payload("A", 1), payload("B", 2), payload("A", 3)];
        assert_eq!(find_duplicate_key(&duplicated, |p| p.ingredient), Some("A"));
    }

    #[test]
    fn test_noop_plan() {
        let plan = plan(Vec::<Line>::new(), Vec::<Payload>::new(), |l| l.ingredient, |p| p.ingredient);
        assert!(plan.is_noop());
    }
}
