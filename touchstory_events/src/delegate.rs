// Copyright 2025 the Touchstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simple selectors for delegated bindings.
//!
//! Selectors test one element at a time (no combinators). Delegation walks up
//! from the event target and tests each ancestor in turn.
//!
//! Grammar:
//! - `tag` (ASCII case-insensitive)
//! - `.class` and `tag.class` (exact token of the whitespace-separated class list)
//! - `#id` and `tag#id` (exact id)
//!
//! A selector containing a `.` is a class selector, otherwise one containing a
//! `#` is an id selector; anything else compares as a tag. Malformed input
//! never panics, it just fails to match.

use crate::host::ElementInfo;

/// A parsed simple selector borrowing its source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `tag`
    Tag(&'a str),
    /// `.class` or `tag.class`; the tag is empty when absent.
    Class {
        /// Required tag, empty for any.
        tag: &'a str,
        /// Required class token.
        class: &'a str,
    },
    /// `#id` or `tag#id`; the tag is empty when absent.
    Id {
        /// Required tag, empty for any.
        tag: &'a str,
        /// Required id.
        id: &'a str,
    },
}

impl<'a> Selector<'a> {
    /// Parses `source`.
    #[must_use]
    pub fn parse(source: &'a str) -> Self {
        if let Some((tag, class)) = source.split_once('.') {
            Self::Class { tag, class }
        } else if let Some((tag, id)) = source.split_once('#') {
            Self::Id { tag, id }
        } else {
            Self::Tag(source)
        }
    }

    /// Returns `true` if `element` matches.
    #[must_use]
    pub fn matches(&self, element: &ElementInfo<'_>) -> bool {
        let tag_ok = |tag: &str| tag.is_empty() || tag.eq_ignore_ascii_case(element.tag_name);
        match *self {
            Self::Tag(tag) => !tag.is_empty() && tag.eq_ignore_ascii_case(element.tag_name),
            Self::Class { tag, class } => {
                tag_ok(tag)
                    && !class.is_empty()
                    && element.class_name.split_ascii_whitespace().any(|c| c == class)
            }
            Self::Id { tag, id } => tag_ok(tag) && !id.is_empty() && element.id == id,
        }
    }
}

/// Returns `true` if `element` matches `selector`.
///
/// `None` stands for a non-element (window, document) and never matches.
#[must_use]
pub fn matches(element: Option<&ElementInfo<'_>>, selector: &str) -> bool {
    element.is_some_and(|e| Selector::parse(selector).matches(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el<'a>(tag_name: &'a str, id: &'a str, class_name: &'a str) -> ElementInfo<'a> {
        ElementInfo {
            tag_name,
            id,
            class_name,
        }
    }

    #[test]
    fn parse_forms() {
        assert_eq!(Selector::parse("li"), Selector::Tag("li"));
        assert_eq!(
            Selector::parse(".item"),
            Selector::Class {
                tag: "",
                class: "item"
            }
        );
        assert_eq!(
            Selector::parse("li.item"),
            Selector::Class {
                tag: "li",
                class: "item"
            }
        );
        assert_eq!(Selector::parse("#main"), Selector::Id { tag: "", id: "main" });
        assert_eq!(
            Selector::parse("div#main"),
            Selector::Id {
                tag: "div",
                id: "main"
            }
        );
    }

    #[test]
    fn class_is_an_exact_token() {
        let e = el("LI", "", "row  item selected");
        assert!(matches(Some(&e), ".item"));
        assert!(matches(Some(&e), "li.item"));
        assert!(!matches(Some(&e), ".ite"));
        assert!(!matches(Some(&e), "div.item"));
        assert!(!matches(Some(&el("li", "", "")), ".item"));
    }

    #[test]
    fn id_is_exact() {
        let e = el("div", "main", "");
        assert!(matches(Some(&e), "#main"));
        assert!(matches(Some(&e), "DIV#main"));
        assert!(!matches(Some(&e), "#Main"));
        assert!(!matches(Some(&e), "span#main"));
    }

    #[test]
    fn tag_ignores_ascii_case() {
        assert!(matches(Some(&el("BUTTON", "", "")), "button"));
        assert!(!matches(Some(&el("BUTTON", "", "")), "butto"));
    }

    #[test]
    fn malformed_and_non_elements_never_match() {
        let e = el("li", "x", "item");
        assert!(!matches(Some(&e), ""));
        assert!(!matches(Some(&e), "."));
        assert!(!matches(Some(&e), "#"));
        assert!(!matches(Some(&e), "li > .item"));
        assert!(!matches(None, "li"));
    }
}
