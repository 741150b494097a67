//! Metadata read and write modes

use crate::error::RepoError;
use std::fmt;
use std::str::FromStr;

/// How much of the graph around a resource the repository returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetadataMode {
    /// Only the resource's own triples
    #[default]
    Resource,
    /// The resource plus resources it points to and resources pointing to it
    Neighbors,
    /// The resource plus everything reachable through the parent property,
    /// in both directions
    Relatives,
}

impl MetadataMode {
    /// Header value understood by the repository
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataMode::Resource => "resource",
            MetadataMode::Neighbors => "neighbors",
            MetadataMode::Relatives => "relatives",
        }
    }
}

impl fmt::Display for MetadataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataMode {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resource" => Ok(MetadataMode::Resource),
            "neighbors" => Ok(MetadataMode::Neighbors),
            "relatives" => Ok(MetadataMode::Relatives),
            other => Err(RepoError::Configuration(format!("unknown metadata mode '{}'", other))),
        }
    }
}

/// How a metadata patch is applied on the repository side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdateMode {
    /// Only add triples; nothing is removed
    Add,
    /// Replace the resource's metadata entirely
    Overwrite,
    /// Add absent triples and replace the values of every predicate present
    /// in the patch
    #[default]
    Merge,
}

impl UpdateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Add => "add",
            UpdateMode::Overwrite => "overwrite",
            UpdateMode::Merge => "merge",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateMode {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(UpdateMode::Add),
            "overwrite" => Ok(UpdateMode::Overwrite),
            "merge" => Ok(UpdateMode::Merge),
            other => Err(RepoError::Configuration(format!("unknown update mode '{}'", other))),
        }
    }
}
