use std::collections::BTreeMap;

/// A pending replacement of `len` bytes at byte offset `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationEdit {
    /// Byte offset into the source string.
    pub position: usize,
    /// Number of source bytes replaced.
    pub len: usize,
    /// Replacement text, empty for a deletion.
    pub replacement: String,
}

/// Edits recorded against an immutable source string and applied in one pass.
///
/// Edits are keyed by position; recording a second edit at the same position
/// replaces the first. Callers never record overlapping spans.
#[derive(Debug, Default)]
pub(crate) struct EditList {
    edits: BTreeMap<usize, NormalizationEdit>,
}

impl EditList {
    pub(crate) fn replace(&mut self, position: usize, len: usize, replacement: &str) {
        self.edits.insert(
            position,
            NormalizationEdit {
                position,
                len,
                replacement: replacement.to_string(),
            },
        );
    }

    pub(crate) fn delete(&mut self, position: usize, len: usize) {
        self.replace(position, len, "");
    }

    /// Applies every edit, highest position first so earlier offsets stay
    /// valid.
    pub(crate) fn apply(self, source: &str) -> String {
        let mut result = source.to_string();
        for edit in self.edits.into_values().rev() {
            result.replace_range(edit.position..edit.position + edit.len, &edit.replacement);
        }
        result
    }
}
