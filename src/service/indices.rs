//! Mapping between statements and the 1-based positions the model refers to

/// Render statements as a 1-based numbered listing, one per line
pub fn numbered_listing<S: AsRef<str>>(statements: &[S]) -> String {
    statements
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve 1-based indices against `source`, keeping the order of `indices`
///
/// Indices outside `1..=source.len()` are dropped.
pub fn resolve_indices(indices: &[i64], source: &[String]) -> Vec<String> {
    indices
        .iter()
        .filter_map(|&index| {
            let position = usize::try_from(index).ok()?.checked_sub(1)?;
            source.get(position).cloned()
        })
        .collect()
}
