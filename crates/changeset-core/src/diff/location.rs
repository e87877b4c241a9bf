use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single step of a [`Location`].
///
/// A segment either selects a mapping key or a sequence index.
///
/// ```
/// # use changeset_core::Segment;
/// let key = Segment::key("name");
/// let index = Segment::index(2);
/// assert!(matches!(key, Segment::Key(_)));
/// assert!(matches!(index, Segment::Index(2)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key lookup.
    Key(String),
    /// Sequence index lookup.
    Index(usize),
}

impl Segment {
    /// Creates a key segment.
    #[must_use]
    pub fn key<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self::Key(value.into())
    }

    /// Creates an index segment.
    #[must_use]
    pub fn index(value: usize) -> Self {
        Self::Index(value)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl Serialize for Segment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Key(key) => serializer.serialize_str(key),
            Self::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Segment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = Segment;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a string key or non-negative integer index")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Segment::Key(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Segment::Key(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let value = usize::try_from(v).map_err(|_| E::custom("negative index"))?;
                Ok(Segment::Index(value))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let value = usize::try_from(v).map_err(|_| E::custom("index exceeds usize"))?;
                Ok(Segment::Index(value))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// The address of a node inside a document.
///
/// An empty location addresses the document root. Locations are snapshots:
/// they carry no reference to the document they were computed against.
///
/// ```
/// # use changeset_core::{Location, Segment};
/// let location = Location::new()
///     .with_segment(Segment::key("prop"))
///     .with_segment(Segment::key("child"))
///     .with_segment(Segment::index(2));
/// assert_eq!(location.serialise().unwrap(), "prop.child[2]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(Vec<Segment>);

impl Location {
    /// Creates the root location.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment, returning the extended location.
    #[must_use]
    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.0.push(segment);
        self
    }

    /// Returns the underlying segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this is the root location.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the location as a dotted/bracketed path for diagnostics.
    ///
    /// Returns `None` for the root location. Pure; never fails.
    ///
    /// ```
    /// # use changeset_core::{Location, Segment};
    /// assert_eq!(Location::new().serialise(), None);
    /// let location = Location::from(vec![Segment::key("arr"), Segment::index(0)]);
    /// assert_eq!(location.serialise().unwrap(), "arr[0]");
    /// ```
    #[must_use]
    pub fn serialise(&self) -> Option<String> {
        let mut segments = self.0.iter();
        let first = segments.next()?;
        let mut rendered = first.to_string();
        for segment in segments {
            match segment {
                Segment::Key(key) => {
                    rendered.push('.');
                    rendered.push_str(key);
                }
                Segment::Index(index) => {
                    let _ = write!(rendered, "[{index}]");
                }
            }
        }
        Some(rendered)
    }
}

impl From<Vec<Segment>> for Location {
    fn from(value: Vec<Segment>) -> Self {
        Self(value)
    }
}

impl From<Segment> for Location {
    fn from(value: Segment) -> Self {
        Self(vec![value])
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.serialise() {
            Some(rendered) => f.write_str(&rendered),
            None => f.write_str("no path"),
        }
    }
}

impl<'a> IntoIterator for &'a Location {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Location {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_serialises_to_none() {
        assert_eq!(Location::new().serialise(), None);
        assert_eq!(Location::new().to_string(), "no path");
    }

    #[test]
    fn single_key_renders_bare() {
        let location = Location::from(Segment::key("foo"));
        assert_eq!(location.serialise().unwrap(), "foo");
    }

    #[test]
    fn nested_keys_and_indices_render() {
        let location = Location::from(vec![
            Segment::key("prop"),
            Segment::index(3),
            Segment::key("child"),
        ]);
        assert_eq!(location.serialise().unwrap(), "prop[3].child");
    }

    #[test]
    fn leading_index_renders_bare() {
        let location = Location::from(vec![Segment::index(2), Segment::key("a")]);
        assert_eq!(location.serialise().unwrap(), "2.a");
    }

    #[test]
    fn serde_round_trip_mixes_keys_and_indices() {
        let location = Location::from(vec![Segment::key("foo"), Segment::index(3)]);
        let json = serde_json::to_string(&location).unwrap();
        assert_eq!(json, "[\"foo\",3]");
        let decoded: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, location);
    }

    #[test]
    fn negative_index_is_rejected() {
        let err = serde_json::from_str::<Location>("[-1]").unwrap_err();
        assert!(err.to_string().contains("negative index"));
    }
}
