//! Requirement trees: boolean expressions over course codes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::CourseCode;

/// How the children of a [`RequirementNode::Group`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Every child is required.
    All,
    /// Any one child satisfies the group.
    One,
    /// Any two children satisfy the group.
    Two,
}

impl GroupKind {
    /// The word joining children when the group is rendered as text.
    const fn separator(self) -> &'static str {
        match self {
            Self::All => " and ",
            Self::One => " or ",
            Self::Two => " ",
        }
    }
}

/// A node in a requirement tree.
///
/// A `Group` always has at least two children: builders collapse one-child
/// groups to the child itself and drop empty ones, see
/// [`RequirementNode::group`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementNode {
    /// A single required course.
    Leaf(CourseCode),
    /// A combination of sub-requirements.
    Group {
        /// How the children combine.
        #[serde(rename = "type")]
        kind: GroupKind,
        /// The sub-requirements, in catalog order.
        #[serde(rename = "courses")]
        children: Vec<RequirementNode>,
    },
}

impl RequirementNode {
    /// Builds a group, upholding the two-or-more children invariant.
    ///
    /// Returns `None` for no children and the child itself for exactly one.
    #[must_use]
    pub fn group(kind: GroupKind, mut children: Vec<Self>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Self::Group { kind, children }),
        }
    }

    /// Merges every child group into its parent when both have the same kind,
    /// so `A and (B and C)` becomes `A and B and C`.
    ///
    /// Idempotent: a consolidated tree is returned unchanged.
    #[must_use]
    pub fn consolidate(self) -> Self {
        match self {
            Self::Leaf(_) => self,
            Self::Group { kind, children } => {
                let mut merged = Vec::with_capacity(children.len());
                for child in children {
                    match child.consolidate() {
                        Self::Group {
                            kind: child_kind,
                            children: grandchildren,
                        } if child_kind == kind => merged.extend(grandchildren),
                        other => merged.push(other),
                    }
                }
                Self::Group {
                    kind,
                    children: merged,
                }
            }
        }
    }

    /// Every leaf code in depth-first order. Duplicates are kept.
    #[must_use]
    pub fn leaves(&self) -> Vec<&CourseCode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a CourseCode>) {
        match self {
            Self::Leaf(code) => out.push(code),
            Self::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// The structured form used for persistence.
    ///
    /// # Panics
    ///
    /// Never in practice: the tree only holds strings and enums.
    #[must_use]
    pub fn to_structured(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("requirement trees always serialize")
    }
}

/// Renders the tree as a normalized requirement string which parses back into
/// an equal tree, e.g. `(CSE 12 and (CSE 15L or CSE 30))`.
impl fmt::Display for RequirementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(code) => write!(f, "{code}"),
            Self::Group { kind, children } => {
                f.write_str("(")?;
                if *kind == GroupKind::Two {
                    f.write_str("two ")?;
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(kind.separator())?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn leaf(code: &str) -> RequirementNode {
        RequirementNode::Leaf(code.parse().unwrap())
    }

    fn group(kind: GroupKind, children: Vec<RequirementNode>) -> RequirementNode {
        RequirementNode::Group { kind, children }
    }

    #[test]
    fn group_collapses_small_child_lists() {
        assert_eq!(RequirementNode::group(GroupKind::All, vec![]), None);
        assert_eq!(
            RequirementNode::group(GroupKind::One, vec![leaf("CSE 12")]),
            Some(leaf("CSE 12"))
        );
    }

    #[test]
    fn consolidate_flattens_same_kind_groups() {
        let tree = group(
            GroupKind::All,
            vec![
                leaf("CSE 12"),
                group(GroupKind::All, vec![leaf("CSE 15L"), leaf("CSE 21")]),
                group(GroupKind::One, vec![leaf("CSE 30"), leaf("ECE 30")]),
            ],
        );
        let expected = group(
            GroupKind::All,
            vec![
                leaf("CSE 12"),
                leaf("CSE 15L"),
                leaf("CSE 21"),
                group(GroupKind::One, vec![leaf("CSE 30"), leaf("ECE 30")]),
            ],
        );
        assert_eq!(tree.consolidate(), expected);
    }

    #[test]
    fn consolidate_merges_nested_levels() {
        let tree = group(
            GroupKind::One,
            vec![
                leaf("MATH 18"),
                group(
                    GroupKind::One,
                    vec![
                        leaf("MATH 20F"),
                        group(GroupKind::One, vec![leaf("MATH 31AH"), leaf("MATH 31AR")]),
                    ],
                ),
            ],
        );
        let consolidated = tree.consolidate();
        assert_eq!(
            consolidated,
            group(
                GroupKind::One,
                vec![
                    leaf("MATH 18"),
                    leaf("MATH 20F"),
                    leaf("MATH 31AH"),
                    leaf("MATH 31AR")
                ]
            )
        );
        assert_eq!(consolidated.clone().consolidate(), consolidated);
    }

    #[test]
    fn two_of_groups_are_not_merged_into_one_of() {
        let tree = group(
            GroupKind::One,
            vec![
                leaf("BILD 1"),
                group(GroupKind::Two, vec![leaf("CHEM 6A"), leaf("CHEM 6B")]),
            ],
        );
        assert_eq!(tree.clone().consolidate(), tree);
    }

    #[test]
    fn structured_form() {
        let tree = group(
            GroupKind::All,
            vec![
                leaf("CSE 12"),
                group(GroupKind::One, vec![leaf("CSE 15L"), leaf("CSE 30")]),
            ],
        );
        assert_eq!(
            tree.to_structured(),
            json!({
                "type": "all",
                "courses": ["CSE 12", {"type": "one", "courses": ["CSE 15L", "CSE 30"]}]
            })
        );
        assert_eq!(leaf("CSE 12").to_structured(), json!("CSE 12"));
    }

    #[test]
    fn structured_form_deserializes() {
        let value = json!({"type": "two", "courses": ["CHEM 6A", "CHEM 6B", "CHEM 6C"]});
        let tree: RequirementNode = serde_json::from_value(value).unwrap();
        assert_eq!(
            tree,
            group(
                GroupKind::Two,
                vec![leaf("CHEM 6A"), leaf("CHEM 6B"), leaf("CHEM 6C")]
            )
        );
    }

    #[test]
    fn display_renders_normalized_text() {
        let tree = group(
            GroupKind::All,
            vec![
                leaf("CSE 12"),
                group(GroupKind::One, vec![leaf("CSE 15L"), leaf("CSE 30")]),
                group(GroupKind::Two, vec![leaf("MATH 18"), leaf("MATH 20A")]),
            ],
        );
        assert_eq!(
            tree.to_string(),
            "(CSE 12 and (CSE 15L or CSE 30) and (two MATH 18 MATH 20A))"
        );
    }

    #[test]
    fn leaves_keep_duplicates_in_order() {
        let tree = group(
            GroupKind::One,
            vec![
                group(GroupKind::All, vec![leaf("CSE 12"), leaf("CSE 21")]),
                group(GroupKind::All, vec![leaf("CSE 12"), leaf("MATH 154")]),
            ],
        );
        let leaves: Vec<_> = tree.leaves().into_iter().map(CourseCode::as_str).collect();
        assert_eq!(leaves, ["CSE 12", "CSE 21", "CSE 12", "MATH 154"]);
    }
}
