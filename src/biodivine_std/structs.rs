use std::collections::HashMap;
use std::hash::Hash;

/// Build a mapping from elements of the given vector to their respective indices.
///
/// **Warning:** Duplicates are not detected or handled in any way, they are just overwritten.
/// Callers that care about duplicates compare the size of the map with the size of `keys`.
pub fn build_index_map<T, F, R>(keys: &[T], transform_index: F) -> HashMap<T, R>
where
    F: Fn(&T, usize) -> R,
    T: Clone + Hash + PartialEq + Eq,
{
    let mut result = HashMap::new();
    for (i, item) in keys.iter().enumerate() {
        result.insert(item.clone(), transform_index(item, i));
    }
    result
}

#[cfg(test)]
mod tests {
    use crate::biodivine_std::structs::build_index_map;

    #[test]
    fn index_map_keeps_last_duplicate() {
        let keys = vec!["a", "b", "a"];
        let map = build_index_map(&keys, |_, i| i);
        assert_eq!(2, map.len());
        assert_eq!(2, map["a"]);
        assert_eq!(1, map["b"]);
    }
}
