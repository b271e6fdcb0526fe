use std::cmp::Ordering;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredIndex {
    pub index: usize,
    pub score: f32,
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// The `k` highest scores, best first. The sort is stable, so equal scores
/// keep their input order; NaN sorts after every number.
pub fn top_k(scores: &[f32], k: usize) -> Vec<ScoredIndex> {
    let mut ranked: Vec<ScoredIndex> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| ScoredIndex { index, score })
        .collect();
    ranked.sort_by(|a, b| descending(a.score, b.score));
    ranked.truncate(k);
    ranked
}
