use serde::{de::DeserializeOwned, de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

/// One element of a desired object list.
///
/// Config files may leave placeholders in a list, written as an empty table
/// or `null`. Those load as [`Entry::Absent`] and are skipped everywhere,
/// instead of turning into an object whose fields are all unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<T> {
    Present(T),
    Absent,
}

impl<T> Entry<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Entry::Present(t) => Some(t),
            Entry::Absent => None,
        }
    }
}

impl<T> From<T> for Entry<T> {
    fn from(t: T) -> Self {
        Entry::Present(t)
    }
}

/// The present elements of an entry list, in order.
pub fn present<T>(entries: &[Entry<T>]) -> impl Iterator<Item = &T> {
    entries.iter().filter_map(Entry::present)
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entry<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::Null => Ok(Entry::Absent),
            Value::Object(fields) if fields.is_empty() => Ok(Entry::Absent),
            _ => serde_json::from_value(value)
                .map(Entry::Present)
                .map_err(D::Error::custom),
        }
    }
}
