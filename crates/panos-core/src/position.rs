// ── Rule position ──
//
// A small constraint language for where a block of rules belongs in an
// ordered rulebase: `first`, `last`, or `before`/`after` a pivot rule,
// either directly adjacent or anywhere on that side.

use serde::Deserialize;
use strum::{EnumString, IntoStaticStr};

use crate::diagnostics::{AttributePath, Diagnostics};
use crate::value::AttrValue;

pub const PIVOT_IGNORED: &str = "pivot ignored";
pub const DIRECTLY_IGNORED: &str = "directly ignored";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Where {
    First,
    Last,
    Before,
    After,
}

/// The host's `position` block, as a three-valued triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PositionInput {
    #[serde(rename = "where")]
    pub where_: AttrValue<String>,
    pub pivot: AttrValue<String>,
    pub directly: AttrValue<bool>,
}

/// Resolved position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulePosition {
    First,
    Last,
    DirectlyBefore(String),
    SomewhereBefore(String),
    DirectlyAfter(String),
    SomewhereAfter(String),
}

impl PositionInput {
    pub fn new(where_: &str) -> Self {
        Self {
            where_: AttrValue::Known(where_.to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn pivot(mut self, pivot: &str) -> Self {
        self.pivot = AttrValue::Known(pivot.to_owned());
        self
    }

    #[must_use]
    pub fn directly(mut self, directly: bool) -> Self {
        self.directly = AttrValue::Known(directly);
        self
    }

    /// Check the triple, reporting against children of `path`.
    ///
    /// Nothing is reported while any part is still unknown; the check
    /// runs again once the host knows every value.
    pub fn validate(&self, path: &AttributePath, diags: &mut Diagnostics) {
        if self.where_.is_unknown() || self.pivot.is_unknown() || self.directly.is_unknown() {
            return;
        }

        let where_path = path.child("where");
        let pivot_path = path.child("pivot");
        let directly_path = path.child("directly");

        let where_ = match &self.where_ {
            AttrValue::Known(raw) => match raw.parse::<Where>() {
                Ok(w) => w,
                Err(_) => {
                    diags.add_attribute_error(
                        where_path,
                        "Invalid attribute value",
                        format!("where must be one of first, last, before, after; got {raw:?}"),
                    );
                    return;
                }
            },
            AttrValue::Null | AttrValue::Unknown => {
                diags.add_attribute_error(
                    where_path,
                    "Missing attribute",
                    "where is required",
                );
                return;
            }
        };

        match where_ {
            Where::First | Where::Last => {
                let literal: &'static str = where_.into();
                if self.pivot.is_known() {
                    diags.add_attribute_warning(
                        pivot_path,
                        PIVOT_IGNORED,
                        format!("pivot has no effect when where is {literal}"),
                    );
                }
                if self.directly.is_known() {
                    diags.add_attribute_warning(
                        directly_path,
                        DIRECTLY_IGNORED,
                        format!("directly has no effect when where is {literal}"),
                    );
                }
            }
            Where::Before | Where::After => match self.pivot.as_known() {
                None if self.directly.is_known() => {
                    diags.add_attribute_error(
                        pivot_path,
                        "Missing attribute",
                        "pivot is required when directly is set",
                    );
                }
                Some(p) if !p.is_empty() => {
                    if self.directly.is_null() {
                        diags.add_attribute_error(
                            directly_path,
                            "Missing attribute",
                            "directly is required when pivot is set",
                        );
                    }
                }
                _ => {
                    diags.add_attribute_error(
                        pivot_path,
                        "Missing attribute",
                        "pivot must be a non-empty rule name when where is before or after",
                    );
                }
            },
        }
    }

    /// Translate a fully known, valid triple. Returns `None` otherwise.
    pub fn to_position(&self) -> Option<RulePosition> {
        let where_ = self.where_.as_known()?.parse::<Where>().ok()?;
        match where_ {
            Where::First => Some(RulePosition::First),
            Where::Last => Some(RulePosition::Last),
            Where::Before | Where::After => {
                let pivot = self.pivot.as_known().filter(|p| !p.is_empty())?.clone();
                let directly = *self.directly.as_known()?;
                Some(match (where_, directly) {
                    (Where::Before, true) => RulePosition::DirectlyBefore(pivot),
                    (Where::Before, false) => RulePosition::SomewhereBefore(pivot),
                    (_, true) => RulePosition::DirectlyAfter(pivot),
                    (_, false) => RulePosition::SomewhereAfter(pivot),
                })
            }
        }
    }
}

impl RulePosition {
    /// XML API `action=move` parameters: (`where`, `dst`).
    pub fn move_target(&self) -> (&'static str, Option<&str>) {
        match self {
            Self::First => ("top", None),
            Self::Last => ("bottom", None),
            Self::DirectlyBefore(p) | Self::SomewhereBefore(p) => ("before", Some(p)),
            Self::DirectlyAfter(p) | Self::SomewhereAfter(p) => ("after", Some(p)),
        }
    }

    /// Whether `names`, as a contiguous block in that order, sits at this
    /// position within the rulebase `order`.
    pub fn is_satisfied<S: AsRef<str>>(&self, order: &[S], names: &[S]) -> bool {
        let Some(first) = names.first() else {
            return true;
        };
        let Some(start) = order.iter().position(|r| r.as_ref() == first.as_ref()) else {
            return false;
        };
        let end = start + names.len() - 1;
        let contiguous = order.len() > end
            && order[start..=end]
                .iter()
                .zip(names)
                .all(|(a, b)| a.as_ref() == b.as_ref());
        if !contiguous {
            return false;
        }

        let pivot_index = |p: &str| {
            if names.iter().any(|n| n.as_ref() == p) {
                return None;
            }
            order.iter().position(|r| r.as_ref() == p)
        };

        match self {
            Self::First => start == 0,
            Self::Last => end + 1 == order.len(),
            Self::DirectlyBefore(p) => pivot_index(p).is_some_and(|i| i == end + 1),
            Self::SomewhereBefore(p) => pivot_index(p).is_some_and(|i| i > end),
            Self::DirectlyAfter(p) => pivot_index(p).is_some_and(|i| i + 1 == start),
            Self::SomewhereAfter(p) => pivot_index(p).is_some_and(|i| i < start),
        }
    }
}
