//! The crisis catalog: every crisis the game can draw from
//!
//! A catalog is validated once, when it is built. Everything downstream
//! (selector, engine, session) relies on it being non-empty, on every crisis
//! in every Plan B chain having at least one solution, and on chains being
//! acyclic and bounded.

use super::crisis::Crisis;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Catalog shipped with the game
pub const BUILTIN_CATALOG: &str = include_str!("crises.json");

/// Plan B chains deeper than this are rejected unless configured otherwise
pub const DEFAULT_MAX_PLAN_B_DEPTH: usize = 8;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read crisis catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse crisis catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("crisis catalog is empty")]
    Empty,

    #[error("crisis `{0}` has no solutions")]
    NoSolutions(String),

    #[error("crisis id `{0}` appears more than once")]
    DuplicateCrisis(String),

    #[error("crisis `{crisis}` lists solution `{solution}` more than once")]
    DuplicateSolution { crisis: String, solution: String },

    #[error("Plan B chain of `{root}` loops back to `{repeated}`")]
    PlanBCycle { root: String, repeated: String },

    #[error("Plan B chain of `{root}` is deeper than {max}")]
    PlanBTooDeep { root: String, max: usize },
}

/// On-disk layout of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CatalogFile {
    version: u32,
    crises: Vec<Crisis>,
}

/// A validated, non-empty set of crises
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisCatalog {
    crises: Vec<Crisis>,
}

impl CrisisCatalog {
    pub fn new(crises: Vec<Crisis>, max_plan_b_depth: usize) -> Result<Self, CatalogError> {
        validate(&crises, max_plan_b_depth)?;
        info!(target: "catalog", crises = crises.len(), "Crisis catalog loaded");
        Ok(Self { crises })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG, DEFAULT_MAX_PLAN_B_DEPTH)
    }

    pub fn from_json_str(json: &str, max_plan_b_depth: usize) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        debug!(target: "catalog", version = file.version, "Parsed catalog file");
        Self::new(file.crises, max_plan_b_depth)
    }

    pub fn from_file(path: &Path, max_plan_b_depth: usize) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents, max_plan_b_depth)
    }

    pub fn len(&self) -> usize {
        self.crises.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.crises.is_empty()
    }

    pub fn crises(&self) -> &[Crisis] {
        &self.crises
    }

    pub fn get(&self, index: usize) -> Option<&Crisis> {
        self.crises.get(index)
    }

    /// First crisis in the catalog. Exists by construction.
    pub fn first(&self) -> &Crisis {
        &self.crises[0]
    }

    /// Look a crisis up by id, searching Plan B chains too
    pub fn find(&self, id: &str) -> Option<&Crisis> {
        self.crises
            .iter()
            .flat_map(|c| c.chain())
            .find(|c| c.id == id)
    }

    /// True if `crisis` is a top-level entry or a Plan B reachable from one
    pub fn contains(&self, crisis: &Crisis) -> bool {
        self.crises
            .iter()
            .flat_map(|c| c.chain())
            .any(|c| c == crisis)
    }
}

fn validate(crises: &[Crisis], max_depth: usize) -> Result<(), CatalogError> {
    if crises.is_empty() {
        return Err(CatalogError::Empty);
    }

    // Ids are unique across the whole catalog, Plan Bs included
    let mut seen = HashSet::new();
    for root in crises {
        let mut on_chain = HashSet::new();
        for (depth, crisis) in root.chain().enumerate() {
            if depth > max_depth {
                return Err(CatalogError::PlanBTooDeep {
                    root: root.id.clone(),
                    max: max_depth,
                });
            }
            if !on_chain.insert(crisis.id.as_str()) {
                return Err(CatalogError::PlanBCycle {
                    root: root.id.clone(),
                    repeated: crisis.id.clone(),
                });
            }
            if !seen.insert(crisis.id.as_str()) {
                return Err(CatalogError::DuplicateCrisis(crisis.id.clone()));
            }
            validate_solutions(crisis)?;
        }
    }

    Ok(())
}

fn validate_solutions(crisis: &Crisis) -> Result<(), CatalogError> {
    if crisis.solutions.is_empty() {
        return Err(CatalogError::NoSolutions(crisis.id.clone()));
    }

    let mut seen = HashSet::new();
    for solution in &crisis.solutions {
        if !seen.insert(solution.id.as_str()) {
            return Err(CatalogError::DuplicateSolution {
                crisis: crisis.id.clone(),
                solution: solution.id.clone(),
            });
        }
    }
    Ok(())
}
