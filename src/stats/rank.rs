use crate::model::RankEntry;
use std::collections::HashMap;

/// The `n` highest counts, descending, ties broken by ascending name.
pub fn top_n(table: &HashMap<String, u64>, n: usize) -> Vec<RankEntry> {
    let mut entries: Vec<(&String, &u64)> = table.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(n)
        .map(|(name, count)| RankEntry {
            name: name.clone(),
            count: *count,
        })
        .collect()
}
