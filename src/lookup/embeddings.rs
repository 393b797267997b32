// src/lookup/embeddings.rs — Vector operations

/// Cosine similarity; 0.0 for empty, mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Index of the row most similar to `query`. First wins on ties.
pub fn best_match(rows: &[Vec<f32>], query: &[f32]) -> Option<(usize, f32)> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| (i, cosine_similarity(row, query)))
        .fold(None, |best, (i, sim)| match best {
            Some((_, b)) if b >= sim => best,
            _ => Some((i, sim)),
        })
}
