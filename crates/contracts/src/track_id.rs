//! TrackId - Cheap-to-clone trajectory identifier
//!
//! Every observation of a track carries its id, and rows inserted while re-gridding clone it,
//! so the id is an `Arc<str>` and cloning only bumps a reference count.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Trajectory identifier (animal, tag, tracked object).
///
/// # Examples
/// ```
/// use contracts::TrackId;
///
/// let id: TrackId = "gull_07".into();
/// let id2 = id.clone();
/// assert_eq!(id, id2);
/// assert_eq!(id.as_str(), "gull_07");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TrackId(Arc<str>);

impl TrackId {
    #[inline]
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for TrackId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<TrackId, _>` be queried with `&str`
impl Borrow<str> for TrackId {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackId {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TrackId {
    #[inline]
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<TrackId> for String {
    fn from(id: TrackId) -> Self {
        id.0.to_string()
    }
}

impl PartialEq<str> for TrackId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TrackId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrackId({:?})", &*self.0)
    }
}
