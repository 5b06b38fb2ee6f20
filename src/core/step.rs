//! Step domain model

use crate::core::{context::BuildIdentifiers, error::ResolveError};
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::sync::LazyLock;

// `$$`, `${name}` or `$name`
static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\$|\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap()
});

/// A declared step whose environment values may still contain `$name` references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTemplate {
    /// Container image reference, e.g. `organization/image:tag`
    pub image: String,

    /// Absolute working directory inside the container
    pub workdir: String,

    /// Environment in declaration order; names are checked for uniqueness at resolve time
    pub env: Vec<(String, String)>,

    /// Executable path followed by its arguments
    pub command: Vec<String>,
}

impl StepTemplate {
    /// Start a step running in the given image
    pub fn on(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            workdir: "/".to_string(),
            env: Vec::new(),
            command: Vec::new(),
        }
    }

    /// Set the working directory
    pub fn at(mut self, workdir: impl Into<String>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((name.into(), value.into()));
        self
    }

    /// Set the command to run
    pub fn run<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Produce a concrete step with every reference substituted
    pub fn render(
        &self,
        step_index: usize,
        identifiers: &BuildIdentifiers,
    ) -> Result<BuildStep, ResolveError> {
        if self.command.is_empty() {
            return Err(ResolveError::EmptyCommand { step_index });
        }

        let mut seen = HashSet::new();
        let mut vars = Vec::with_capacity(self.env.len());

        for (name, template) in &self.env {
            // `-e NAME=value` cannot carry an empty name or one containing `=`
            if name.is_empty() || name.contains('=') {
                return Err(ResolveError::InvalidEnvironmentName {
                    step_index,
                    name: name.clone(),
                });
            }

            if !seen.insert(name.as_str()) {
                return Err(ResolveError::DuplicateEnvironment {
                    step_index,
                    name: name.clone(),
                });
            }

            let value = substitute(template, identifiers).map_err(|reference| {
                ResolveError::UnresolvedReference {
                    step_index,
                    variable: name.clone(),
                    reference,
                }
            })?;
            vars.push((name.clone(), value));
        }

        Ok(BuildStep {
            image: self.image.clone(),
            workdir: self.workdir.clone(),
            env: Environment { vars },
            command: self.command.clone(),
        })
    }
}

/// A fully concrete step, ready to hand to a container runner
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BuildStep {
    pub image: String,
    pub workdir: String,
    pub env: Environment,
    pub command: Vec<String>,
}

impl BuildStep {
    /// Short label for logs, e.g. `maxmanuylov/go-build:1.8 /bin/bash build/build.sh`
    pub fn describe(&self) -> String {
        format!("{} {}", self.image, self.command.join(" "))
    }
}

/// Ordered environment with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(String, String)>,
}

impl Environment {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.vars.len()))?;
        for (name, value) in &self.vars {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Replace every reference in `template` with its identifier value.
///
/// Returns the name of the first reference that has no value.
pub fn substitute(template: &str, identifiers: &BuildIdentifiers) -> Result<String, String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in REFERENCE_REGEX.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        rendered.push_str(&template[last..whole.start()]);

        match caps.get(1).or_else(|| caps.get(2)) {
            Some(name) => match identifiers.lookup(name.as_str()) {
                Some(value) => rendered.push_str(value),
                None => return Err(name.as_str().to_string()),
            },
            None => rendered.push('$'),
        }

        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

/// Names referenced by a template, in order of appearance
pub fn references(template: &str) -> Vec<String> {
    REFERENCE_REGEX
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|name| name.as_str().to_string())
        .collect()
}
