//! Locating virtual-object reference tags in record content.
//!
//! A reference tag is any `<ref …>` or `<link …>` element whose `id`
//! attribute holds `<targetId>_<recordIndex>.<ext>`, e.g.
//! `<ref id="0192…_0.xtad"/>`. Prefixed attributes such as `data-id` or
//! `xml:id` are not targets. Nothing else of the markup is interpreted.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use xtad_types::ObjectId;

static REFERENCE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<\s*(?:ref|link)\b[^>]*?\sid\s*=\s*["']([^"'_<>/\\\s]+)_(\d+)\.([A-Za-z0-9]+)["']"#,
    )
    .expect("hardcoded reference tag pattern is valid")
});

/// One reference tag found in a record's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceTag {
    pub target: ObjectId,
    pub record: usize,
    pub ext: String,
    /// Byte range of the target id inside the scanned content.
    pub target_span: Range<usize>,
}

/// Every reference tag in `content`, in order of appearance.
///
/// Tags whose target is not a usable object id are ignored.
pub fn scan(content: &str) -> Vec<ReferenceTag> {
    REFERENCE_TAG
        .captures_iter(content)
        .filter_map(|caps| {
            let target = caps.get(1)?;
            Some(ReferenceTag {
                target: ObjectId::parse(target.as_str()).ok()?,
                record: caps.get(2)?.as_str().parse().ok()?,
                ext: caps.get(3)?.as_str().to_string(),
                target_span: target.range(),
            })
        })
        .collect()
}

/// Distinct target ids referenced from `content`, in first-seen order.
pub fn referenced_ids(content: &str) -> Vec<ObjectId> {
    let mut ids: Vec<ObjectId> = Vec::new();
    for tag in scan(content) {
        if !ids.contains(&tag.target) {
            ids.push(tag.target);
        }
    }
    ids
}
