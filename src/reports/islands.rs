//! Islands-and-gaps: group an ordered sequence into maximal adjacent runs.
//!
//! One sequential scan; a new island starts whenever the adjacency predicate
//! between the previous item and the current one fails. Both the alarm
//! incident extractor (validity-window adjacency per alarm key) and the
//! energy segmenter (consecutive "on" intervals) are built on this.

/// Split `items` into islands. `continues(prev, current)` decides whether
/// `current` extends the island that `prev` belongs to; the first item
/// always opens an island.
pub fn group_adjacent<T, F>(items: Vec<T>, continues: F) -> Vec<Vec<T>>
where
    F: Fn(&T, &T) -> bool,
{
    let mut islands: Vec<Vec<T>> = Vec::new();
    for item in items {
        match islands.last_mut() {
            Some(island) => {
                // Islands are never empty, so last() is always present.
                let extends = island.last().is_some_and(|prev| continues(prev, &item));
                if extends {
                    island.push(item);
                } else {
                    islands.push(vec![item]);
                }
            }
            None => islands.push(vec![item]),
        }
    }
    islands
}
