//! Project descriptor - the declarative input of a build pipeline

use crate::core::step::StepTemplate;

/// A named project with a version and the steps that build it.
///
/// Mirrors the fluent form:
///
/// ```
/// use buildpipe::core::{ProjectDescriptor, StepTemplate};
///
/// let descriptor = ProjectDescriptor::builder("jongleur")
///     .version(0, 9)
///     .step(
///         StepTemplate::on("maxmanuylov/go-build:1.8")
///             .at("/go/src/github.com/maxmanuylov/jongleur")
///             .with_env("VERSION", "$versionText")
///             .with_env("BUILD", "$buildText")
///             .with_env("REVISION", "$revision")
///             .run(["/bin/bash", "build/build.sh"]),
///     )
///     .build();
///
/// assert_eq!(descriptor.steps.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,

    /// Signed so that a negative literal survives until resolution rejects it
    pub version_major: i64,

    pub version_minor: i64,

    /// Steps in execution order
    pub steps: Vec<StepTemplate>,
}

impl ProjectDescriptor {
    pub fn builder(name: impl Into<String>) -> ProjectDescriptorBuilder {
        ProjectDescriptorBuilder {
            name: name.into(),
            version_major: 0,
            version_minor: 0,
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectDescriptorBuilder {
    name: String,
    version_major: i64,
    version_minor: i64,
    steps: Vec<StepTemplate>,
}

impl ProjectDescriptorBuilder {
    pub fn version(mut self, major: i64, minor: i64) -> Self {
        self.version_major = major;
        self.version_minor = minor;
        self
    }

    pub fn step(mut self, step: StepTemplate) -> Self {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> ProjectDescriptor {
        ProjectDescriptor {
            name: self.name,
            version_major: self.version_major,
            version_minor: self.version_minor,
            steps: self.steps,
        }
    }
}
