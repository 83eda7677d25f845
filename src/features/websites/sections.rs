//! Ordered section list behind the drag-and-drop page builder.
//!
//! Everything here is pure: callers load the list from `websites.config`, apply an
//! operation and persist the returned list.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::core::error::AppError;
use crate::features::websites::models::BusinessType;
use crate::features::websites::variants::{is_known_variant, is_section_allowed};
use crate::shared::constants::MAX_SECTIONS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SectionEntry {
    /// Section kind, e.g. "hero" or "menu"; unique within a page
    pub id: String,
    /// Visual implementation, e.g. "grid" or "carousel"
    pub variant: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("Index {index} is out of range for {len} sections")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Section '{0}' not found")]
    NotFound(String),

    #[error("Section '{0}' appears more than once")]
    Duplicate(String),

    #[error("Section '{section}' is not available for {business_type} sites")]
    NotAllowed {
        section: String,
        business_type: BusinessType,
    },

    #[error("Section '{section}' has no variant '{variant}'")]
    UnknownVariant { section: String, variant: String },

    #[error("A page can hold at most {max} sections, got {count}")]
    TooMany { count: usize, max: usize },
}

impl From<SectionError> for AppError {
    fn from(e: SectionError) -> Self {
        match e {
            SectionError::NotFound(_) => AppError::NotFound(e.to_string()),
            _ => AppError::Validation(e.to_string()),
        }
    }
}

/// Move the item at `from` to position `to`, keeping everything else in relative order
pub fn move_section<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, SectionError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(SectionError::IndexOutOfRange { index, len });
        }
    }

    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(moved)
}

pub fn set_visibility(
    sections: &[SectionEntry],
    section_id: &str,
    visible: bool,
) -> Result<Vec<SectionEntry>, SectionError> {
    if !sections.iter().any(|s| s.id == section_id) {
        return Err(SectionError::NotFound(section_id.to_string()));
    }

    Ok(sections
        .iter()
        .map(|s| SectionEntry {
            visible: if s.id == section_id { visible } else { s.visible },
            ..s.clone()
        })
        .collect())
}

/// Check a full section list against the vertical's registry
pub fn validate_sections(
    business_type: BusinessType,
    sections: &[SectionEntry],
) -> Result<(), SectionError> {
    if sections.len() > MAX_SECTIONS {
        return Err(SectionError::TooMany {
            count: sections.len(),
            max: MAX_SECTIONS,
        });
    }

    let mut seen = HashSet::with_capacity(sections.len());
    for section in sections {
        if !seen.insert(section.id.as_str()) {
            return Err(SectionError::Duplicate(section.id.clone()));
        }
        if !is_section_allowed(business_type, &section.id) {
            return Err(SectionError::NotAllowed {
                section: section.id.clone(),
                business_type,
            });
        }
        if !is_known_variant(&section.id, &section.variant) {
            return Err(SectionError::UnknownVariant {
                section: section.id.clone(),
                variant: section.variant.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::websites::variants::default_sections;

    fn entry(id: &str, variant: &str) -> SectionEntry {
        SectionEntry {
            id: id.to_string(),
            variant: variant.to_string(),
            visible: true,
        }
    }

    #[test]
    fn test_move_to_front() {
        let moved = move_section(&["A", "B", "C", "D"], 2, 0).unwrap();
        assert_eq!(moved, vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn test_move_to_back() {
        let moved = move_section(&["A", "B", "C", "D"], 0, 3).unwrap();
        assert_eq!(moved, vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_move_same_index_is_identity() {
        let items = ["A", "B", "C"];
        assert_eq!(move_section(&items, 1, 1).unwrap(), items.to_vec());
    }

    #[test]
    fn test_move_preserves_every_element_once() {
        let items: Vec<u32> = (0..8).collect();
        for from in 0..items.len() {
            for to in 0..items.len() {
                let mut moved = move_section(&items, from, to).unwrap();
                assert_eq!(moved[to], items[from]);
                moved.sort_unstable();
                assert_eq!(moved, items);
            }
        }
    }

    #[test]
    fn test_move_out_of_range() {
        assert_eq!(
            move_section(&["A", "B"], 2, 0),
            Err(SectionError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            move_section(&["A", "B"], 0, 5),
            Err(SectionError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert!(move_section::<&str>(&[], 0, 0).is_err());
    }

    #[test]
    fn test_set_visibility() {
        let sections = vec![entry("hero", "split"), entry("menu", "grid")];
        let updated = set_visibility(&sections, "menu", false).unwrap();
        assert!(updated[0].visible);
        assert!(!updated[1].visible);
        assert_eq!(updated[1].variant, "grid");

        assert_eq!(
            set_visibility(&sections, "pricing", false),
            Err(SectionError::NotFound("pricing".to_string()))
        );
    }

    #[test]
    fn test_validate_sections() {
        let restaurant = BusinessType::Restaurant;
        assert!(validate_sections(restaurant, &default_sections(restaurant)).is_ok());

        let duplicate = vec![entry("hero", "split"), entry("hero", "video")];
        assert_eq!(
            validate_sections(restaurant, &duplicate),
            Err(SectionError::Duplicate("hero".to_string()))
        );

        let wrong_vertical = vec![entry("classes", "schedule")];
        assert!(matches!(
            validate_sections(restaurant, &wrong_vertical),
            Err(SectionError::NotAllowed { .. })
        ));

        let bad_variant = vec![entry("menu", "carousel")];
        assert!(matches!(
            validate_sections(restaurant, &bad_variant),
            Err(SectionError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_section_entry_visible_defaults_true() {
        let parsed: SectionEntry =
            serde_json::from_str(r#"{"id":"hero","variant":"split"}"#).unwrap();
        assert!(parsed.visible);
    }
}
