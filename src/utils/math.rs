//! Math utility functions

/// Compute cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

/// Argmax - index of the first maximum value
pub fn argmax(x: &[f32]) -> usize {
    x.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (idx, &v)| match best {
            Some((_, max)) if v <= max => best,
            _ => Some((idx, v)),
        })
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}
