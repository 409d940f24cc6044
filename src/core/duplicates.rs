use crate::domain::model::Car;
use crate::domain::ports::Codec;
use crate::utils::error::Result;
use std::collections::HashSet;

/// Candidates equal to at least one existing record, in candidate order.
pub fn matching(candidates: &[Car], existing: &[Car]) -> Vec<Car> {
    let known: HashSet<&Car> = existing.iter().collect();
    candidates
        .iter()
        .filter(|car| known.contains(car))
        .cloned()
        .collect()
}

/// Splits candidates into `(fresh, duplicates)` against a known duplicate set.
pub fn partition(candidates: &[Car], duplicates: &[Car]) -> (Vec<Car>, Vec<Car>) {
    let dup_set: HashSet<&Car> = duplicates.iter().collect();
    candidates
        .iter()
        .cloned()
        .partition(|car| !dup_set.contains(car))
}

/// Decodes `target` with `codec` and reports which candidates it already holds.
///
/// A target that does not exist yet holds nothing; every other failure is
/// returned as is.
pub async fn find_duplicates(
    codec: &dyn Codec,
    candidates: &[Car],
    target: &str,
) -> Result<Vec<Car>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let existing = match codec.import(target).await {
        Ok(existing) => existing,
        Err(e) if e.is_not_found() => {
            tracing::debug!("{} does not exist yet, no duplicates possible", target);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let duplicates = matching(candidates, &existing);
    tracing::debug!(
        "{} of {} candidates already in {} ({} existing records)",
        duplicates.len(),
        candidates.len(),
        target,
        existing.len()
    );
    Ok(duplicates)
}
