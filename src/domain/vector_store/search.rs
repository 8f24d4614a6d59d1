//! Linear-scan ranking over stored records

use std::cmp::Ordering;

use super::{DocumentFilter, VectorRecord};
use crate::domain::similarity::SimilarityFunction;
use crate::domain::DomainError;

/// Score every record passing `filter` against `query` and return the best `k`
/// as `(record index, score)` pairs, highest score first.
///
/// Equal scores keep their insertion order: only a strictly greater score
/// moves a record ahead. NaN scores rank below everything else.
pub fn rank_by_similarity(
    records: &[VectorRecord],
    query: &[f32],
    k: usize,
    filter: Option<&DocumentFilter>,
    similarity: &dyn SimilarityFunction,
) -> Result<Vec<(usize, f32)>, DomainError> {
    if k == 0 || records.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if let Some(filter) = filter {
            if !filter(&record.to_document()) {
                continue;
            }
        }

        if record.dimensions() != query.len() {
            return Err(DomainError::dimension_mismatch(
                record.dimensions(),
                query.len(),
            ));
        }

        let score = similarity.score(query, record.embedding());
        let score = if score.is_nan() { f32::NEG_INFINITY } else { score };

        scored.push((index, score));
    }

    // sort_by is stable, which is what keeps first-seen order among ties
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);

    Ok(scored)
}

/// Greedy maximal marginal relevance selection
///
/// Picks up to `k` of `candidates`, each step taking the candidate maximizing
/// `lambda * sim(query, c) - (1 - lambda) * max(sim(c, already_picked))`.
/// Returns indices into `candidates` in pick order.
pub fn maximal_marginal_relevance(
    query: &[f32],
    candidates: &[&[f32]],
    k: usize,
    lambda: f32,
    similarity: &dyn SimilarityFunction,
) -> Vec<usize> {
    let k = k.min(candidates.len());
    if k == 0 {
        return Vec::new();
    }

    let relevance: Vec<f32> = candidates
        .iter()
        .map(|c| similarity.score(query, c))
        .collect();

    let mut selected: Vec<usize> = Vec::with_capacity(k);

    // The first pick is the plain best match
    let mut first = 0;
    for (i, score) in relevance.iter().enumerate() {
        if *score > relevance[first] {
            first = i;
        }
    }
    selected.push(first);

    while selected.len() < k {
        let mut best: Option<(usize, f32)> = None;

        for (i, candidate) in candidates.iter().enumerate() {
            if selected.contains(&i) {
                continue;
            }

            let redundancy = selected
                .iter()
                .map(|&s| similarity.score(candidate, candidates[s]))
                .fold(f32::NEG_INFINITY, f32::max);
            let score = lambda * relevance[i] - (1.0 - lambda) * redundancy;

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((i, score)),
            }
        }

        match best {
            Some((i, _)) => selected.push(i),
            None => break,
        }
    }

    selected
}
