//! Pipeline and stage types

use super::group::GroupSpec;
use super::predicate::MatchSpec;
use super::project::ProjectSpec;
use super::sort::SortSpec;

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Filter records by a predicate, preserving relative order
    Match(MatchSpec),
    /// Partition records and compute accumulated columns
    Group(GroupSpec),
    /// Derive fields on each working record
    Project(ProjectSpec),
    /// Re-order the working set
    Sort(SortSpec),
    /// Truncate the working set to its first `n` rows
    Limit(usize),
    /// Replace the result with a single `{count: N}` row and stop
    Count,
}

impl Stage {
    /// Stage name in the wire vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Group(_) => "$group",
            Stage::Project(_) => "$project",
            Stage::Sort(_) => "$sort",
            Stage::Limit(_) => "$limit",
            Stage::Count => "$count",
        }
    }
}

/// An ordered list of stages, applied strictly left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends a stage in place.
    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl FromIterator<Stage> for Pipeline {
    fn from_iter<T: IntoIterator<Item = Stage>>(iter: T) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::MatchSpec;

    #[test]
    fn test_builder_order() {
        let pipeline = Pipeline::new()
            .then(Stage::Match(MatchSpec::new()))
            .then(Stage::Limit(5))
            .then(Stage::Count);

        let names: Vec<_> = pipeline.stages().iter().map(Stage::name).collect();
        assert_eq!(names, vec!["$match", "$limit", "$count"]);
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn test_empty_pipeline() {
        assert!(Pipeline::new().is_empty());
    }
}
