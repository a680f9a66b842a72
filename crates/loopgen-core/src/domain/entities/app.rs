//! Application selection: LoopBack version, starter template, app name.
//!
//! The documents whose content depends on these choices (`package.json`,
//! `.yo-rc.json`, `server/component-config.json`) are built here instead of
//! living in template files.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::domain::error::DomainError;
use crate::domain::naming;

/// Supported LoopBack major versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopbackVersion {
    V2,
    #[default]
    V3,
}

impl LoopbackVersion {
    pub const ALL: [LoopbackVersion; 2] = [LoopbackVersion::V2, LoopbackVersion::V3];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "2.x",
            Self::V3 => "3.x",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::V2 => "long term support",
            Self::V3 => "current",
        }
    }

    /// Starter templates available for this version, in display order.
    pub fn templates(self) -> &'static [AppTemplateKind] {
        match self {
            Self::V2 => &[
                AppTemplateKind::ApiServer,
                AppTemplateKind::EmptyServer,
                AppTemplateKind::HelloWorld,
            ],
            Self::V3 => &AppTemplateKind::ALL,
        }
    }

    /// Semver range written for the `loopback` dependency.
    pub fn loopback_range(self) -> &'static str {
        match self {
            Self::V2 => "^2.22.0",
            Self::V3 => "^3.0.0",
        }
    }

    fn explorer_range(self) -> &'static str {
        match self {
            Self::V2 => "^2.4.0",
            Self::V3 => "^6.0.0",
        }
    }

    fn available() -> Vec<String> {
        Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
    }
}

impl fmt::Display for LoopbackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoopbackVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2.x" | "2" => Ok(Self::V2),
            "3.x" | "3" => Ok(Self::V3),
            other => Err(DomainError::InvalidVersion {
                given: other.to_string(),
                available: Self::available(),
            }),
        }
    }
}

/// Starter application templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppTemplateKind {
    ApiServer,
    EmptyServer,
    HelloWorld,
    Notes,
}

impl AppTemplateKind {
    pub const ALL: [AppTemplateKind; 4] = [
        AppTemplateKind::ApiServer,
        AppTemplateKind::EmptyServer,
        AppTemplateKind::HelloWorld,
        AppTemplateKind::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ApiServer => "api-server",
            Self::EmptyServer => "empty-server",
            Self::HelloWorld => "hello-world",
            Self::Notes => "notes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ApiServer => "A LoopBack API server with local User auth",
            Self::EmptyServer => "An empty LoopBack API, without any configured models or datasources",
            Self::HelloWorld => "A project containing a controller, including a single vanilla Message and a single remote method",
            Self::Notes => "A project containing a basic working example, including a memory database",
        }
    }
}

impl fmt::Display for AppTemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated (version, template) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppTarget {
    version: LoopbackVersion,
    template: AppTemplateKind,
}

impl AppTarget {
    /// Pair a version with a template name, rejecting templates the version
    /// does not ship.
    pub fn new(version: LoopbackVersion, template: &str) -> Result<Self, DomainError> {
        let given = template.trim();
        version
            .templates()
            .iter()
            .copied()
            .find(|t| t.as_str() == given)
            .map(|template| Self { version, template })
            .ok_or_else(|| DomainError::InvalidAppTemplate {
                given: given.to_string(),
                version: version.to_string(),
                available: version
                    .templates()
                    .iter()
                    .map(|t| t.as_str().to_string())
                    .collect(),
            })
    }

    /// Parse both selections from user input.
    pub fn parse(version: &str, template: &str) -> Result<Self, DomainError> {
        Self::new(version.parse()?, template)
    }

    pub fn version(&self) -> LoopbackVersion {
        self.version
    }

    pub fn template(&self) -> AppTemplateKind {
        self.template
    }
}

impl fmt::Display for AppTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.template, self.version)
    }
}

/// Application name normalized to a package-safe slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    /// `x.y`, `x y` and `x@y` all become `x-y`.
    pub fn normalize(raw: &str) -> Result<Self, DomainError> {
        let slug = naming::slugify(raw);
        if slug.is_empty() {
            return Err(DomainError::InvalidAppName {
                name: raw.to_string(),
                reason: "name must contain at least one letter or digit".into(),
            });
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a new application needs beyond its template files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBlueprint {
    pub name: AppName,
    pub target: AppTarget,
    pub explorer: bool,
}

impl AppBlueprint {
    pub fn new(name: AppName, target: AppTarget, explorer: bool) -> Self {
        Self {
            name,
            target,
            explorer,
        }
    }

    /// Minimal `package.json`. Dependencies are declared, not installed.
    pub fn package_json(&self) -> Value {
        let version = self.target.version();
        let mut dependencies = serde_json::Map::new();
        dependencies.insert("compression".into(), json!("^1.0.3"));
        dependencies.insert("cors".into(), json!("^2.5.2"));
        dependencies.insert("helmet".into(), json!("^3.10.0"));
        dependencies.insert("loopback-boot".into(), json!("^2.6.5"));
        dependencies.insert("serve-favicon".into(), json!("^2.0.1"));
        dependencies.insert("strong-error-handler".into(), json!("^3.0.0"));
        if version == LoopbackVersion::V2 {
            dependencies.insert("loopback-datasource-juggler".into(), json!("^2.39.0"));
        }
        if self.explorer {
            dependencies.insert(
                "loopback-component-explorer".into(),
                json!(version.explorer_range()),
            );
        }
        dependencies.insert("loopback".into(), json!(version.loopback_range()));

        json!({
            "name": self.name.as_str(),
            "version": "1.0.0",
            "main": "server/server.js",
            "engines": { "node": ">=6" },
            "scripts": {
                "lint": "eslint .",
                "start": "node .",
                "posttest": "npm run lint"
            },
            "dependencies": dependencies,
            "devDependencies": {
                "eslint": "^3.17.1",
                "eslint-config-loopback": "^8.0.0"
            },
            "repository": { "type": "", "url": "" },
            "license": "UNLICENSED",
            "description": self.name.as_str()
        })
    }

    /// `.yo-rc.json` marking the directory as a LoopBack project root.
    pub fn yo_rc(&self) -> Value {
        json!({
            "generator-loopback": {
                "loopbackVersion": self.target.version().as_str()
            }
        })
    }

    /// `server/component-config.json`.
    pub fn component_config(&self) -> Value {
        if self.explorer {
            json!({ "loopback-component-explorer": { "mountPath": "/explorer" } })
        } else {
            json!({})
        }
    }
}
