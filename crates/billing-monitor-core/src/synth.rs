//! Synthesis of a declared stack into a deployment template
//!
//! Synthesis is separate from declaration: a [`Stack`] can be fed to any
//! [`Synthesizer`]. The CloudFormation one renders the template; the
//! [`CloudAssembly`] writer lays it out the way `cdk deploy` expects.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::models::ResourceProperties;
use crate::stack::{validate_stack_name, Stack};

const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
const ASSEMBLY_SCHEMA_VERSION: &str = "36.0.0";

/// Turns a declared stack into some deployable artifact
pub trait Synthesizer {
    /// What synthesis produces
    type Output;

    /// Render `stack`
    fn synthesize(&self, stack: &Stack) -> Result<Self::Output>;
}

/// A CloudFormation template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    /// Template format version
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: &'static str,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resources keyed by logical id
    pub resources: BTreeMap<String, ResourceProperties>,
}

impl Template {
    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Renders stacks as CloudFormation templates
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudFormationSynthesizer;

impl Synthesizer for CloudFormationSynthesizer {
    type Output = Template;

    fn synthesize(&self, stack: &Stack) -> Result<Template> {
        let resources = stack
            .resources()
            .iter()
            .map(|resource| {
                (
                    resource.logical_id.as_str().to_string(),
                    resource.properties.clone(),
                )
            })
            .collect();

        Ok(Template {
            format_version: TEMPLATE_FORMAT_VERSION,
            description: stack.description().map(ToString::to_string),
            resources,
        })
    }
}

/// Paths written by [`CloudAssembly::write`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyPaths {
    /// The stack template
    pub template: PathBuf,
    /// The assembly manifest
    pub manifest: PathBuf,
}

/// A cloud assembly directory
#[derive(Debug, Clone)]
pub struct CloudAssembly {
    dir: PathBuf,
}

impl CloudAssembly {
    /// An assembly rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `<dir>/<stack>.template.json` and `<dir>/manifest.json`
    pub fn write(&self, stack: &Stack, template: &Template) -> Result<AssemblyPaths> {
        validate_stack_name(stack.name())?;
        fs::create_dir_all(&self.dir)?;

        let template_file = format!("{}.template.json", stack.name());
        let template_path = self.dir.join(&template_file);
        fs::write(&template_path, template.to_json_pretty()?)?;

        let region = stack.region().unwrap_or("unknown-region");
        let manifest = json!({
            "version": ASSEMBLY_SCHEMA_VERSION,
            "artifacts": {
                stack.name(): {
                    "type": "aws:cloudformation:stack",
                    "environment": format!("aws://unknown-account/{region}"),
                    "properties": {
                        "templateFile": template_file,
                    },
                },
            },
        });
        let manifest_path = self.dir.join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

        info!(
            template = %template_path.display(),
            manifest = %manifest_path.display(),
            "cloud assembly written"
        );
        Ok(AssemblyPaths {
            template: template_path,
            manifest: manifest_path,
        })
    }
}
