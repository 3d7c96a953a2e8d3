use std::collections::HashMap;
use std::hash::Hash;

/// Returns the most frequent label, or `None` for an empty input.
///
/// Ties go to the label that appeared first, so the result only depends on input order.
pub fn majority_label<'a, L, I>(labels: I) -> Option<L>
where
    L: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = &'a L>,
{
    // label -> (votes, position of first appearance)
    let mut votes: HashMap<&L, (usize, usize)> = HashMap::new();
    for (position, label) in labels.into_iter().enumerate() {
        votes.entry(label).or_insert((0, position)).0 += 1;
    }

    votes
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(label, _)| label.clone())
}
