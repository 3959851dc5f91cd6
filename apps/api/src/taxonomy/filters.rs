//! Assessability filtering for taxonomy elements.
//!
//! Generic abilities (vision, dexterity, basic reasoning) and generic soft
//! skills (active listening, writing) do not differentiate real-world
//! competence and cannot be assessed via multiple-choice quiz. The deny-list
//! is a data artifact, not code — tune it by editing the bundled JSON or
//! pointing `SKILL_DENYLIST_PATH` at an override file.

use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::taxonomy::client::TaxonomyElement;

const BUNDLED_DENYLIST: &str = include_str!("denylist.json");

#[derive(Debug, Deserialize)]
struct DenyListFile {
    generic_abilities: Vec<String>,
    generic_soft_skills: Vec<String>,
}

/// Curated set of element names excluded from skill ingestion.
#[derive(Debug)]
pub struct DenyList {
    names: HashSet<String>,
}

impl DenyList {
    /// Loads the deny-list shipped with the binary.
    pub fn bundled() -> Self {
        // The bundled artifact is validated by tests; a parse failure here is
        // a build defect, not a runtime condition.
        serde_json::from_str::<DenyListFile>(BUNDLED_DENYLIST)
            .map(Self::from_file)
            .expect("bundled denylist.json is malformed")
    }

    /// Loads a deny-list override from disk.
    pub fn from_path(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deny-list file '{path}'"))?;
        let file: DenyListFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse deny-list file '{path}'"))?;
        Ok(Self::from_file(file))
    }

    /// Loads from the configured override path, or the bundled artifact.
    pub fn load(override_path: Option<&str>) -> Result<Self> {
        match override_path {
            Some(path) => {
                let list = Self::from_path(path)?;
                if list.is_empty() {
                    warn!("Skill deny-list override at {path} is empty — no elements will be filtered");
                } else {
                    info!("Loaded skill deny-list override from {path} ({} names)", list.len());
                }
                Ok(list)
            }
            None => Ok(Self::bundled()),
        }
    }

    fn from_file(file: DenyListFile) -> Self {
        let names = file
            .generic_abilities
            .into_iter()
            .chain(file.generic_soft_skills)
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when the element name is not on the deny-list.
    pub fn is_assessable(&self, name: &str) -> bool {
        !self.names.contains(name)
    }

    /// Drops deny-listed elements, keeping domain knowledge and professional
    /// skills.
    pub fn filter_assessable(&self, elements: Vec<TaxonomyElement>) -> Vec<TaxonomyElement> {
        elements
            .into_iter()
            .filter(|e| self.is_assessable(&e.name))
            .collect()
    }
}
