//! Rewriting reference targets after duplication.

use serde::{Deserialize, Serialize};
use xtad_types::ObjectId;

use crate::scan::scan;

/// How an old target id is replaced in record content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemapMode {
    /// Replace every textual occurrence of the old id anywhere in the content.
    #[default]
    Global,
    /// Replace the old id only where it is the target of a reference tag.
    TagsOnly,
}

/// Replace `old` with `new` in `content` according to `mode`.
pub fn remap(content: &str, old: &ObjectId, new: &ObjectId, mode: RemapMode) -> String {
    match mode {
        RemapMode::Global => content.replace(old.as_str(), new.as_str()),
        RemapMode::TagsOnly => {
            let mut out = String::with_capacity(content.len());
            let mut cursor = 0;
            for tag in scan(content).into_iter().filter(|t| &t.target == old) {
                out.push_str(&content[cursor..tag.target_span.start]);
                out.push_str(new.as_str());
                cursor = tag.target_span.end;
            }
            out.push_str(&content[cursor..]);
            out
        }
    }
}
