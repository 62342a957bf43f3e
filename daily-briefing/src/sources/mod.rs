pub mod legal_tech;
pub mod world;

pub use legal_tech::LEGAL_TECH_KEYWORDS;

use crate::types::{Category, Source};

/// Per-category source lists. Fixed at construction and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    world: Vec<Source>,
    legal_tech: Vec<Source>,
}

impl SourceCatalog {
    pub fn new(world: Vec<Source>, legal_tech: Vec<Source>) -> Self {
        Self { world, legal_tech }
    }

    pub fn sources_for(&self, category: Category) -> &[Source] {
        match category {
            Category::World => &self.world,
            Category::LegalTech => &self.legal_tech,
        }
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self::new(world::default_sources(), legal_tech::default_sources())
    }
}
