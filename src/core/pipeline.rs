//! Pipeline domain model and descriptor resolution

use crate::core::{
    context::{BuildContext, BuildIdentifiers},
    descriptor::ProjectDescriptor,
    error::ResolveError,
    step::BuildStep,
};
use serde::Serialize;
use tracing::debug;

/// A resolved pipeline: concrete steps in execution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    /// Project name
    pub name: String,

    /// Identifiers the steps were resolved against
    pub identifiers: BuildIdentifiers,

    /// Concrete steps, in execution order
    pub steps: Vec<BuildStep>,
}

impl Pipeline {
    /// Resolve a descriptor against a build context.
    ///
    /// Pure: the same descriptor and context always produce an equal pipeline,
    /// and nothing is executed.
    pub fn resolve(
        descriptor: &ProjectDescriptor,
        context: &BuildContext,
    ) -> Result<Self, ResolveError> {
        let (major, minor) = match (
            u64::try_from(descriptor.version_major),
            u64::try_from(descriptor.version_minor),
        ) {
            (Ok(major), Ok(minor)) => (major, minor),
            _ => {
                return Err(ResolveError::InvalidVersion {
                    major: descriptor.version_major,
                    minor: descriptor.version_minor,
                })
            }
        };

        if descriptor.steps.is_empty() {
            return Err(ResolveError::NoSteps {
                name: descriptor.name.clone(),
            });
        }

        if context.revision.trim().is_empty() {
            return Err(ResolveError::InvalidContext(
                "revision must be a non-empty identifier".to_string(),
            ));
        }

        let identifiers = BuildIdentifiers::compute(major, minor, context);
        debug!(
            "Resolving {} as {} (revision {})",
            descriptor.name, identifiers.build_text, identifiers.revision
        );

        let steps = descriptor
            .steps
            .iter()
            .enumerate()
            .map(|(index, template)| template.render(index, &identifiers))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Pipeline {
            name: descriptor.name.clone(),
            identifiers,
            steps,
        })
    }

    /// Get a step by its position
    pub fn step(&self, index: usize) -> Option<&BuildStep> {
        self.steps.get(index)
    }
}

/// Free-function form of [`Pipeline::resolve`]
pub fn resolve(
    descriptor: &ProjectDescriptor,
    context: &BuildContext,
) -> Result<Pipeline, ResolveError> {
    Pipeline::resolve(descriptor, context)
}
