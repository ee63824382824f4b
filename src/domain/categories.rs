//! Canonical complaint categories and free-label canonicalization.
//!
//! The submission form sends free-form category labels; every label maps
//! into one fixed canonical bucket. Unknown or empty input canonicalizes to
//! [`Category::OtherIssues`] rather than failing the submission.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RoadsInfrastructure,
    GarbageCollection,
    WaterSupply,
    StreetLighting,
    DrainageSewerage,
    ParksRecreation,
    StrayAnimals,
    NoiseNuisance,
    OtherIssues,
}

impl Category {
    /// The display label persisted on complaint rows and used for grouping.
    pub fn label(self) -> &'static str {
        match self {
            Category::RoadsInfrastructure => "Roads & Infrastructure",
            Category::GarbageCollection => "Garbage Collection",
            Category::WaterSupply => "Water Supply",
            Category::StreetLighting => "Street Lighting",
            Category::DrainageSewerage => "Drainage & Sewerage",
            Category::ParksRecreation => "Parks & Recreation",
            Category::StrayAnimals => "Stray Animals",
            Category::NoiseNuisance => "Noise & Nuisance",
            Category::OtherIssues => "Other Issues",
        }
    }

    /// Map a raw form label to its canonical bucket. Matching is
    /// case-insensitive and keyed on the words citizens actually type;
    /// anything unrecognized lands in the Other bucket.
    pub fn canonicalize(raw: &str) -> Category {
        let needle = raw.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Category::OtherIssues;
        }

        const KEYWORDS: &[(&str, Category)] = &[
            ("road", Category::RoadsInfrastructure),
            ("pothole", Category::RoadsInfrastructure),
            ("footpath", Category::RoadsInfrastructure),
            ("garbage", Category::GarbageCollection),
            ("waste", Category::GarbageCollection),
            ("trash", Category::GarbageCollection),
            ("water", Category::WaterSupply),
            ("streetlight", Category::StreetLighting),
            ("street light", Category::StreetLighting),
            ("light", Category::StreetLighting),
            ("drain", Category::DrainageSewerage),
            ("sewer", Category::DrainageSewerage),
            ("park", Category::ParksRecreation),
            ("playground", Category::ParksRecreation),
            ("stray", Category::StrayAnimals),
            ("animal", Category::StrayAnimals),
            ("dog", Category::StrayAnimals),
            ("noise", Category::NoiseNuisance),
        ];

        // An exact canonical label round-trips unchanged.
        for category in ALL {
            if needle == category.label().to_ascii_lowercase() {
                return *category;
            }
        }

        for (keyword, category) in KEYWORDS {
            if needle.contains(keyword) {
                return *category;
            }
        }

        Category::OtherIssues
    }
}

const ALL: &[Category] = &[
    Category::RoadsInfrastructure,
    Category::GarbageCollection,
    Category::WaterSupply,
    Category::StreetLighting,
    Category::DrainageSewerage,
    Category::ParksRecreation,
    Category::StrayAnimals,
    Category::NoiseNuisance,
    Category::OtherIssues,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_maps_to_garbage_collection() {
        assert_eq!(Category::canonicalize("garbage"), Category::GarbageCollection);
        assert_eq!(
            Category::canonicalize("Garbage Collection").label(),
            "Garbage Collection"
        );
        assert_eq!(Category::canonicalize("  WASTE pickup "), Category::GarbageCollection);
    }

    #[test]
    fn unknown_labels_fall_back_to_other() {
        assert_eq!(Category::canonicalize("unknown-xyz"), Category::OtherIssues);
        assert_eq!(Category::canonicalize(""), Category::OtherIssues);
        assert_eq!(Category::canonicalize("   "), Category::OtherIssues);
    }

    #[test]
    fn canonical_labels_round_trip() {
        for category in ALL {
            assert_eq!(Category::canonicalize(category.label()), *category);
        }
    }

    #[test]
    fn keyword_variants_map_to_expected_buckets() {
        assert_eq!(Category::canonicalize("pothole on main road"), Category::RoadsInfrastructure);
        assert_eq!(Category::canonicalize("no water since morning"), Category::WaterSupply);
        assert_eq!(Category::canonicalize("broken streetlight"), Category::StreetLighting);
        assert_eq!(Category::canonicalize("blocked drain"), Category::DrainageSewerage);
        assert_eq!(Category::canonicalize("stray dogs"), Category::StrayAnimals);
    }
}
