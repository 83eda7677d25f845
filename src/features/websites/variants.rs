//! Registry of page sections and the visual variants each one ships with.
//!
//! Template sites render a section by `(id, variant)`, so anything stored in a website's
//! section list must name an entry here. Each vertical only offers the sections that make
//! sense for it (a gym has classes, a restaurant has a menu).

use crate::features::websites::models::BusinessType;
use crate::features::websites::sections::SectionEntry;

pub struct SectionSpec {
    pub id: &'static str,
    /// First entry is the default
    pub variants: &'static [&'static str],
}

pub const SECTION_CATALOG: &[SectionSpec] = &[
    SectionSpec {
        id: "hero",
        variants: &["centered", "split", "video", "carousel"],
    },
    SectionSpec {
        id: "about",
        variants: &["simple", "with-image", "timeline"],
    },
    SectionSpec {
        id: "menu",
        variants: &["grid", "list", "tabs"],
    },
    SectionSpec {
        id: "services",
        variants: &["grid", "list", "cards"],
    },
    SectionSpec {
        id: "classes",
        variants: &["schedule", "grid"],
    },
    SectionSpec {
        id: "pricing",
        variants: &["cards", "table"],
    },
    SectionSpec {
        id: "gallery",
        variants: &["grid", "carousel", "masonry"],
    },
    SectionSpec {
        id: "team",
        variants: &["grid", "carousel"],
    },
    SectionSpec {
        id: "testimonials",
        variants: &["carousel", "grid", "quotes"],
    },
    SectionSpec {
        id: "booking",
        variants: &["form", "calendar"],
    },
    SectionSpec {
        id: "products",
        variants: &["grid", "list", "carousel"],
    },
    SectionSpec {
        id: "hours",
        variants: &["table", "compact"],
    },
    SectionSpec {
        id: "contact",
        variants: &["form", "map", "split"],
    },
];

pub fn find_section(id: &str) -> Option<&'static SectionSpec> {
    SECTION_CATALOG.iter().find(|spec| spec.id == id)
}

pub fn is_known_variant(section_id: &str, variant: &str) -> bool {
    find_section(section_id).is_some_and(|spec| spec.variants.contains(&variant))
}

/// Sections offered for a vertical, in default page order
pub fn allowed_sections(business_type: BusinessType) -> &'static [&'static str] {
    match business_type {
        BusinessType::Restaurant => &[
            "hero",
            "about",
            "menu",
            "gallery",
            "testimonials",
            "booking",
            "hours",
            "contact",
        ],
        BusinessType::Gym => &[
            "hero",
            "about",
            "classes",
            "pricing",
            "team",
            "testimonials",
            "gallery",
            "hours",
            "contact",
        ],
        BusinessType::Salon => &[
            "hero",
            "about",
            "services",
            "pricing",
            "team",
            "gallery",
            "testimonials",
            "booking",
            "hours",
            "contact",
        ],
        BusinessType::Clinic => &[
            "hero",
            "about",
            "services",
            "team",
            "testimonials",
            "booking",
            "hours",
            "contact",
        ],
        BusinessType::Repair => &[
            "hero",
            "about",
            "services",
            "pricing",
            "testimonials",
            "booking",
            "hours",
            "contact",
        ],
        BusinessType::Store => &[
            "hero",
            "about",
            "products",
            "gallery",
            "testimonials",
            "hours",
            "contact",
        ],
    }
}

pub fn is_section_allowed(business_type: BusinessType, section_id: &str) -> bool {
    allowed_sections(business_type).contains(&section_id)
}

/// Layout a freshly created site starts with: every allowed section, default variant, visible
pub fn default_sections(business_type: BusinessType) -> Vec<SectionEntry> {
    allowed_sections(business_type)
        .iter()
        .filter_map(|id| find_section(id))
        .map(|spec| SectionEntry {
            id: spec.id.to_string(),
            variant: spec.variants[0].to_string(),
            visible: true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [BusinessType; 6] = [
        BusinessType::Restaurant,
        BusinessType::Gym,
        BusinessType::Salon,
        BusinessType::Clinic,
        BusinessType::Repair,
        BusinessType::Store,
    ];

    #[test]
    fn test_every_allowed_section_is_in_catalog() {
        for business_type in ALL_TYPES {
            for id in allowed_sections(business_type) {
                let spec = find_section(id)
                    .unwrap_or_else(|| panic!("{} missing from catalog", id));
                assert!(!spec.variants.is_empty());
            }
        }
    }

    #[test]
    fn test_default_sections_cover_allowed_list() {
        for business_type in ALL_TYPES {
            let defaults = default_sections(business_type);
            assert_eq!(defaults.len(), allowed_sections(business_type).len());
            assert!(defaults.iter().all(|s| s.visible));
            assert_eq!(defaults[0].id, "hero");
        }
    }

    #[test]
    fn test_vertical_specific_sections() {
        assert!(is_section_allowed(BusinessType::Restaurant, "menu"));
        assert!(!is_section_allowed(BusinessType::Gym, "menu"));
        assert!(is_section_allowed(BusinessType::Gym, "classes"));
        assert!(is_section_allowed(BusinessType::Store, "products"));
        assert!(!is_section_allowed(BusinessType::Store, "booking"));
    }

    #[test]
    fn test_known_variants() {
        assert!(is_known_variant("gallery", "masonry"));
        assert!(!is_known_variant("gallery", "table"));
        assert!(!is_known_variant("unknown", "grid"));
    }
}
