use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of a real object.
///
/// Freshly generated ids are UUID v7 strings (`8-4-4-4-12` hex groups): the
/// leading 48 bits carry the creation time in milliseconds, so ids sort in
/// creation order. No registry of issued ids is kept; collisions are
/// accepted as negligible.
///
/// Ids read back from disk or from reference tags are treated as opaque
/// strings and only checked for characters that would escape the store
/// directory or make the `<id>_<n>` file layout ambiguous.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a new time-ordered object ID (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Parse an externally supplied identifier.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let invalid = |reason: &str| TypeError::InvalidId {
            id: s.to_string(),
            reason: reason.to_string(),
        };
        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if s.contains(['/', '\\']) {
            return Err(invalid("must not contain path separators"));
        }
        if s.contains('_') {
            return Err(invalid("must not contain '_'"));
        }
        if s.contains("..") {
            return Err(invalid("must not contain '..'"));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("must not contain whitespace or control characters"));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }

    /// Millisecond timestamp embedded in a UUID v7 id.
    ///
    /// Returns `None` for legacy or non-v7 identifiers.
    pub fn timestamp_ms(&self) -> Option<u64> {
        let uuid = uuid::Uuid::parse_str(&self.0).ok()?;
        if uuid.get_version_num() != 7 {
            return None;
        }
        let (secs, nanos) = uuid.get_timestamp()?.to_unix();
        Some(secs * 1000 + u64::from(nanos) / 1_000_000)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_id())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_has_uuid_layout() {
        let id = ObjectId::generate();
        let groups: Vec<usize> = id.as_str().split('-').map(str::len).collect();
        assert_eq!(groups, vec![8, 4, 4, 4, 12]);
        assert!(id
            .as_str()
            .chars()
            .all(|c| c == '-' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_id_carries_version_and_variant() {
        let id = ObjectId::generate();
        let groups: Vec<&str> = id.as_str().split('-').collect();
        // Version nibble leads the third group.
        assert!(groups[2].starts_with('7'));
        // Variant bits `10` make the fourth group start with 8, 9, a or b.
        let first = groups[3].chars().next().unwrap();
        let rfc_variant = matches!(first, '8' | '9' | 'a' | 'b');
        assert!(rfc_variant, "variant nibble {first}");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ObjectId::generate();
        let b = ObjectId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn timestamp_tracks_wall_clock() {
        let before = chrono::Utc::now().timestamp_millis() as u64;
        let id = ObjectId::generate();
        let after = chrono::Utc::now().timestamp_millis() as u64;
        let ts = id.timestamp_ms().unwrap();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn ids_sort_by_creation_time() {
        let a = ObjectId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = ObjectId::generate();
        assert!(a < b);
    }

    #[test]
    fn legacy_ids_have_no_timestamp() {
        let id = ObjectId::parse("legacy-object").unwrap();
        assert_eq!(id.timestamp_ms(), None);
    }

    #[test]
    fn parse_rejects_escaping_ids() {
        assert!(ObjectId::parse("").is_err());
        assert!(ObjectId::parse("../etc").is_err());
        assert!(ObjectId::parse("a/b").is_err());
        assert!(ObjectId::parse("a\\b").is_err());
        assert!(ObjectId::parse("a b").is_err());
        assert!(ObjectId::parse("a_0").is_err());
    }

    #[test]
    fn short_id_is_prefix() {
        let id = ObjectId::parse("0192a3b4-0000-7000-8000-000000000000").unwrap();
        assert_eq!(id.short_id(), "0192a3b4");
        assert_eq!(ObjectId::parse("abc").unwrap().short_id(), "abc");
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = ObjectId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serde_rejects_invalid_id() {
        let err = serde_json::from_str::<ObjectId>("\"../x\"");
        assert!(err.is_err());
    }
}
