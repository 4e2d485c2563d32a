use crate::source::{
    Arrayable, Enumerable, Jsonable, SourceMap, SourceShape, Traversable, Value, to_value_lossy,
};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// An insertion-ordered, keyed collection.
///
/// Items built from a list are keyed `"0"`, `"1"`, ...; keyed construction keeps the caller's
/// keys. Mapping preserves keys and order, which is what `Dto::from_collection` relies on.
/// Equality compares entries in order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: IndexMap<String, T>,
    /// One past the largest numeric key seen so far.
    next_index: usize,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: IndexMap::new(), next_index: 0 }
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.iter().eq(other.items.iter())
    }
}

impl<T: Eq> Eq for Collection<T> {}

impl<T> Collection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection keeping the given keys; a repeated key replaces the earlier item.
    pub fn keyed<K, I>(items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        items.into_iter().fold(Self::new(), |mut collection, (key, item)| {
            collection.put(key, item);
            collection
        })
    }

    /// Appends under the next free numeric key.
    pub fn push(&mut self, item: T) {
        let key = self.next_index.to_string();
        self.put(key, item);
    }

    /// Inserts under `key`, replacing an existing item in place.
    pub fn put(&mut self, key: impl Into<String>, item: T) {
        let key = key.into();
        if let Ok(index) = key.parse::<usize>() {
            self.next_index = self.next_index.max(index.saturating_add(1));
        }
        self.items.insert(key, item);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.get(key)
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first().map(|(_, item)| item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(key, item)| (key.as_str(), item))
    }

    /// Maps every item, keeping keys and order.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Collection<U> {
        Collection {
            items: self.items.iter().map(|(key, item)| (key.clone(), f(item))).collect(),
            next_index: self.next_index,
        }
    }

    /// Fallible [`Collection::map`]; stops at the first error.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(&T) -> Result<U, E>) -> Result<Collection<U>, E> {
        let items = self
            .items
            .iter()
            .map(|(key, item)| f(item).map(|mapped| (key.clone(), mapped)))
            .collect::<Result<IndexMap<_, _>, E>>()?;
        Ok(Collection { items, next_index: self.next_index })
    }

    #[must_use]
    pub fn into_values(self) -> Vec<T> {
        self.items.into_values().collect()
    }
}

impl<T: Serialize> Collection<T> {
    fn export(&self) -> SourceMap {
        self.items.iter().map(|(key, item)| (key.clone(), to_value_lossy(item))).collect()
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: IndexMap<_, _> =
            iter.into_iter().enumerate().map(|(i, item)| (i.to_string(), item)).collect();
        Self { next_index: items.len(), items }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = (String, T);
    type IntoIter = indexmap::map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (key, item) in &self.items {
            map.serialize_entry(key, item)?;
        }
        map.end()
    }
}

impl<T: Serialize> Enumerable for Collection<T> {
    fn all(&self) -> Value {
        Value::Object(self.export())
    }
}

impl<T: Serialize> Arrayable for Collection<T> {
    fn to_array(&self) -> Value {
        Value::Object(self.export())
    }
}

impl<T: Serialize> Jsonable for Collection<T> {
    fn to_json(&self) -> String {
        Value::Object(self.export()).to_string()
    }
}

impl<T: Serialize> Traversable for Collection<T> {
    fn iterate(&self) -> Box<dyn Iterator<Item = (String, Value)> + '_> {
        Box::new(self.items.iter().map(|(key, item)| (key.clone(), to_value_lossy(item))))
    }
}

impl<T: Serialize> SourceShape for Collection<T> {
    fn as_enumerable(&self) -> Option<&dyn Enumerable> {
        Some(self)
    }

    fn as_arrayable(&self) -> Option<&dyn Arrayable> {
        Some(self)
    }

    fn as_jsonable(&self) -> Option<&dyn Jsonable> {
        Some(self)
    }

    fn as_traversable(&self) -> Option<&dyn Traversable> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_items_are_keyed_by_index() {
        let collection: Collection<i32> = vec![10, 20, 30].into();
        assert_eq!(collection.keys().collect::<Vec<_>>(), ["0", "1", "2"]);
        assert_eq!(collection.get("1"), Some(&20));
    }

    #[test]
    fn put_replaces_in_place_and_push_uses_next_index() {
        let mut collection = Collection::keyed([("a", 1), ("5", 2), ("b", 3)]);
        collection.put("a", 9);
        collection.push(4);

        assert_eq!(
            collection.iter().map(|(k, v)| (k.to_owned(), *v)).collect::<Vec<_>>(),
            [("a".to_owned(), 9), ("5".to_owned(), 2), ("b".to_owned(), 3), ("6".to_owned(), 4)]
        );
    }

    #[test]
    fn try_map_stops_on_first_error() {
        let collection: Collection<i32> = vec![1, -2, 3].into();
        let mut seen = Vec::new();
        let result: Result<Collection<i32>, String> = collection.try_map(|v| {
            seen.push(*v);
            if *v < 0 { Err(format!("negative: {v}")) } else { Ok(v * 2) }
        });

        assert_eq!(result.unwrap_err(), "negative: -2");
        assert_eq!(seen, [1, -2]);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let collection = Collection::keyed([("z", 1), ("a", 2)]);
        assert_eq!(serde_json::to_string(&collection).unwrap(), r#"{"z":1,"a":2}"#);
        assert_eq!(collection.all(), json!({"z": 1, "a": 2}));
        assert_eq!(collection.to_json(), r#"{"z":1,"a":2}"#);
    }

    #[test]
    fn equality_follows_entry_order() {
        let forward = Collection::keyed([("a", 1), ("b", 2)]);
        let backward = Collection::keyed([("b", 2), ("a", 1)]);
        assert_ne!(forward, backward);
        assert_eq!(forward, forward.map(|v| *v));
    }

    #[test]
    fn large_keyed_collections_build_and_grow() {
        const ITEMS: usize = 50_000;

        let mut collection = Collection::keyed((0..ITEMS).map(|i| (format!("user-{i}"), i)));
        assert_eq!(collection.len(), ITEMS);
        assert_eq!(collection.get("user-49999"), Some(&49_999));

        for i in 0..ITEMS {
            collection.push(i);
        }
        assert_eq!(collection.len(), ITEMS * 2);
        assert_eq!(collection.get("0"), Some(&0));
        assert_eq!(collection.get("49999"), Some(&49_999));

        collection.put("user-0", 7);
        assert_eq!(collection.first(), Some(&7));
        assert_eq!(collection.keys().last(), Some("49999"));
    }
}
