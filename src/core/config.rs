//! Project descriptor configuration from YAML

use crate::core::{
    context::REFERENCE_NAMES,
    descriptor::ProjectDescriptor,
    step::{references, StepTemplate},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Top-level descriptor file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorConfig {
    /// Project name
    pub name: String,

    /// Project version; missing fields default to 0
    #[serde(default)]
    pub version: VersionConfig,

    /// Build steps, in execution order
    pub steps: Vec<StepConfig>,
}

/// `version: { major: 0, minor: 9 }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionConfig {
    #[serde(default)]
    pub major: i64,

    #[serde(default)]
    pub minor: i64,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Container image reference
    pub image: String,

    /// Absolute working directory inside the container
    pub workdir: String,

    /// Environment variables; values may reference `$versionText`, `$buildText`, `$revision`
    #[serde(default)]
    env: Mapping,

    /// Executable followed by its arguments
    pub run: Vec<String>,
}

impl StepConfig {
    /// Environment as ordered name/value pairs
    pub fn env_pairs(&self) -> Result<Vec<(String, String)>> {
        self.env
            .iter()
            .map(|(key, value)| {
                let name = match key {
                    Value::String(s) => s.clone(),
                    other => anyhow::bail!(
                        "Environment variable name must be a string, got {:?}",
                        other
                    ),
                };
                let value = match value {
                    Value::String(s) => s.clone(),
                    // YAML number text is lost on parse (`1.10` reads back as `1.1`)
                    Value::Number(n) => anyhow::bail!(
                        "Environment variable '{}' has numeric value {}; quote it to keep it as written",
                        name,
                        n
                    ),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    _ => anyhow::bail!(
                        "Environment variable '{}' must have a scalar value",
                        name
                    ),
                };
                Ok((name, value))
            })
            .collect()
    }
}

impl DescriptorConfig {
    /// Load a descriptor from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a descriptor from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: DescriptorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the descriptor
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Project name must not be empty");
        }

        if self.steps.is_empty() {
            anyhow::bail!("Project '{}' declares no steps", self.name);
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.image.trim().is_empty() {
                anyhow::bail!("Step {} has an empty image", index);
            }

            if !step.workdir.starts_with('/') {
                anyhow::bail!(
                    "Step {} working directory must be absolute, got '{}'",
                    index,
                    step.workdir
                );
            }

            if step.run.is_empty() {
                anyhow::bail!("Step {} has an empty command", index);
            }

            for (name, value) in step.env_pairs()? {
                if let Some(unknown) = references(&value)
                    .into_iter()
                    .find(|r| !REFERENCE_NAMES.contains(&r.as_str()))
                {
                    anyhow::bail!(
                        "Step {} variable '{}' references unknown '${}' (expected one of: {})",
                        index,
                        name,
                        unknown,
                        REFERENCE_NAMES.join(", ")
                    );
                }
            }
        }

        Ok(())
    }

    /// Convert config to a descriptor domain model
    pub fn to_descriptor(&self) -> Result<ProjectDescriptor> {
        let mut builder = ProjectDescriptor::builder(&self.name)
            .version(self.version.major, self.version.minor);

        for step in &self.steps {
            let template = step.env_pairs()?.into_iter().fold(
                StepTemplate::on(&step.image).at(&step.workdir),
                |template, (name, value)| template.with_env(name, value),
            );
            builder = builder.step(template.run(step.run.iter().cloned()));
        }

        Ok(builder.build())
    }
}
