//! First-start database seeding.
//!
//! An empty database gets a batch of generated companies, a source
//! collection containing all of them, and an empty liked collection. A
//! settings flag makes the whole thing run at most once.

use tracing::info;

use crate::config::SeedConfig;

use super::{CollectionStore, StoreError};

/// What seeding created (or found already present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub seeded: bool,
    pub companies: usize,
}

const ADJECTIVES: &[&str] = &[
    "Amber", "Basalt", "Cedar", "Drift", "Ember", "Fable", "Granite", "Harbor", "Iron", "Juniper",
    "Kestrel", "Lumen", "Meadow", "Noble", "Orchard", "Pioneer", "Quartz", "River", "Summit",
    "Timber", "Umber", "Vantage", "Willow", "Zenith",
];

const NOUNS: &[&str] = &[
    "Analytics", "Biotech", "Cargo", "Dynamics", "Energy", "Farms", "Goods", "Holdings",
    "Industries", "Journeys", "Kitchens", "Labs", "Motors", "Networks", "Outfitters", "Partners",
    "Robotics", "Studios", "Textiles", "Ventures",
];

/// Deterministic company name for seed index `i`.
fn company_name(i: usize) -> String {
    let adjective = ADJECTIVES[i % ADJECTIVES.len()];
    let noun = NOUNS[(i / ADJECTIVES.len()) % NOUNS.len()];
    let round = i / (ADJECTIVES.len() * NOUNS.len());
    if round == 0 {
        format!("{adjective} {noun}")
    } else {
        format!("{adjective} {noun} {}", round + 1)
    }
}

/// Seed the store on first start; a no-op on every later start.
pub fn seed_if_needed(
    store: &dyn CollectionStore,
    config: &SeedConfig,
) -> Result<SeedSummary, StoreError> {
    if store.is_seeded()? {
        return Ok(SeedSummary {
            seeded: false,
            companies: 0,
        });
    }

    info!(companies = config.companies, "seeding empty database");

    let names: Vec<String> = (0..config.companies).map(company_name).collect();
    let company_ids = store.create_companies(&names)?;

    let source = store.create_collection(&config.source_collection)?;
    store.insert_members(source.id, &company_ids)?;

    // The liked collection starts empty.
    store.create_collection(&config.liked_collection)?;

    store.mark_seeded()?;

    info!(
        source = %config.source_collection,
        liked = %config.liked_collection,
        "database seeded"
    );

    Ok(SeedSummary {
        seeded: true,
        companies: company_ids.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteCollectionStore;

    fn seed_config(companies: usize) -> SeedConfig {
        SeedConfig {
            companies,
            ..Default::default()
        }
    }

    #[test]
    fn test_company_names_are_unique() {
        let count = ADJECTIVES.len() * NOUNS.len() + 10;
        let names: std::collections::HashSet<String> = (0..count).map(company_name).collect();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn test_seed_creates_collections_and_members() {
        let store = SqliteCollectionStore::in_memory("Liked Companies List").unwrap();
        let summary = seed_if_needed(&store, &seed_config(25)).unwrap();
        assert!(summary.seeded);
        assert_eq!(summary.companies, 25);

        let collections = store.list_collections().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].collection_name, "My List");
        assert_eq!(collections[0].total, 25);
        assert_eq!(collections[1].collection_name, "Liked Companies List");
        assert_eq!(collections[1].total, 0);
    }

    #[test]
    fn test_seed_runs_once() {
        let store = SqliteCollectionStore::in_memory("Liked Companies List").unwrap();
        assert!(seed_if_needed(&store, &seed_config(5)).unwrap().seeded);

        let again = seed_if_needed(&store, &seed_config(5)).unwrap();
        assert!(!again.seeded);
        assert_eq!(store.list_collections().unwrap().len(), 2);
    }
}
