//! Serde support.
//!
//! Every tree serializes as its flattened sequence of optional payloads and
//! deserializes through the flat decoder.

use alloc::vec::Vec;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::arena::{self, Slots};
use crate::{flat, owned, OrderedTree};

/// Serializes the flattened form of the tree.
fn serialize_flat<Tr, Se>(tree: &Tr, serializer: Se) -> Result<Se::Ok, Se::Error>
where
    Tr: OrderedTree,
    Tr::Item: Serialize,
    Se: Serializer,
{
    let mut seq = serializer.serialize_seq(None)?;
    flat::encode_with(tree, |slot| seq.serialize_element(&slot))?;
    seq.end()
}

impl<T, S> Serialize for arena::Tree<T, S>
where
    T: Serialize,
    S: Slots<T>,
{
    fn serialize<Se>(&self, serializer: Se) -> Result<Se::Ok, Se::Error>
    where
        Se: Serializer,
    {
        serialize_flat(self, serializer)
    }
}

impl<'de, T, S> Deserialize<'de> for arena::Tree<T, S>
where
    T: Deserialize<'de>,
    S: Slots<T>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let slots = Vec::<Option<T>>::deserialize(deserializer)?;
        flat::decode(slots).map_err(de::Error::custom)
    }
}

impl<T: Serialize> Serialize for owned::Tree<T> {
    fn serialize<Se>(&self, serializer: Se) -> Result<Se::Ok, Se::Error>
    where
        Se: Serializer,
    {
        serialize_flat(self, serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for owned::Tree<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let slots = Vec::<Option<T>>::deserialize(deserializer)?;
        flat::decode(slots).map_err(de::Error::custom)
    }
}
