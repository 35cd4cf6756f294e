use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use uuid::Uuid;

/// Type-safe identifier wrapper. The phantom type parameter `T` prevents
/// mixing IDs from different entity types (e.g., Lead ID vs Pool ID).
///
/// Ids are opaque strings: seeded records use short readable ids
/// ("pool_sales", "u4") and generated ones use UUID text.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    value: String,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _phantom: PhantomData,
        }
    }

    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Foo;

    #[test]
    fn generate_creates_unique_ids() {
        let id1 = Id::<Foo>::generate();
        let id2 = Id::<Foo>::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn ids_with_same_text_are_equal() {
        let id1 = Id::<Foo>::new("pool_bdc");
        let id2: Id<Foo> = "pool_bdc".into();
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "pool_bdc");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = Id::<Foo>::new("u4");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u4\"");
        let back: Id<Foo> = serde_json::from_str("\"u4\"").unwrap();
        assert_eq!(back, id);
    }
}
