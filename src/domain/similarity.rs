//! Pluggable vector scoring functions
//!
//! Every function scores two equal-length vectors, higher meaning more
//! similar. Dimension checks are the caller's job; the built-ins return
//! `0.0` on mismatched or empty input rather than panicking.

use std::fmt::Debug;
use std::sync::Arc;

/// A pure, symmetric scoring function over two vectors
pub trait SimilarityFunction: Send + Sync + Debug {
    fn score(&self, a: &[f32], b: &[f32]) -> f32;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}

/// Cosine of the angle between two vectors, in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineSimilarity;

impl SimilarityFunction for CosineSimilarity {
    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }

    fn name(&self) -> &'static str {
        "cosine"
    }
}

/// Raw inner product; only comparable across normalized embeddings
#[derive(Debug, Clone, Copy, Default)]
pub struct DotProduct;

impl SimilarityFunction for DotProduct {
    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        dot_product(a, b)
    }

    fn name(&self) -> &'static str {
        "dot_product"
    }
}

/// `1 / (1 + euclidean_distance)`, in `(0, 1]`
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanSimilarity;

impl SimilarityFunction for EuclideanSimilarity {
    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let distance: f32 = a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt();

        1.0 / (1.0 + distance)
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

/// Adapts a plain closure into a [`SimilarityFunction`]
pub struct FnSimilarity<F> {
    name: &'static str,
    f: F,
}

impl<F> FnSimilarity<F>
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> Debug for FnSimilarity<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSimilarity").field("name", &self.name).finish()
    }
}

impl<F> SimilarityFunction for FnSimilarity<F>
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        (self.f)(a, b)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// The default scoring function
pub fn default_similarity() -> Arc<dyn SimilarityFunction> {
    Arc::new(CosineSimilarity)
}

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot = dot_product(a, b);
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![0.3, -1.2, 4.0];

        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];

        assert!(cosine_similarity(&a, &b).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];

        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        let empty: Vec<f32> = vec![];

        assert_eq!(cosine_similarity(&empty, &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-0.5, 0.25, 2.0];

        assert_eq!(CosineSimilarity.score(&a, &b), CosineSimilarity.score(&b, &a));
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(DotProduct.score(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(DotProduct.name(), "dot_product");
    }

    #[test]
    fn test_euclidean_similarity() {
        assert_eq!(EuclideanSimilarity.score(&[1.0, 1.0], &[1.0, 1.0]), 1.0);
        assert!((EuclideanSimilarity.score(&[0.0, 0.0], &[3.0, 4.0]) - 1.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_fn_similarity() {
        let negative_l1 = FnSimilarity::new("neg_l1", |a: &[f32], b: &[f32]| {
            -a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f32>()
        });

        assert_eq!(negative_l1.score(&[1.0, 2.0], &[2.0, 0.0]), -3.0);
        assert_eq!(negative_l1.name(), "neg_l1");
        assert!(format!("{negative_l1:?}").contains("neg_l1"));
    }
}
