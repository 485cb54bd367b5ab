//! Native agent autoload discovery.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::options::{LaunchOption, OptionSource};

/// File name pattern an agent must match in full.
#[derive(Debug, Clone)]
pub struct AgentPattern {
    regex: Regex,
}

impl AgentPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { regex })
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

/// A discovered agent library. Lives only until it becomes an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDescriptor {
    path: PathBuf,
}

impl AgentDescriptor {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_option(self) -> LaunchOption {
        LaunchOption::new(
            format!("-agentpath:{}", self.path.display()),
            OptionSource::Agent,
        )
    }
}

/// List agents in `dir`, in directory enumeration order.
///
/// A missing or unreadable directory yields no agents.
pub fn discover_agents(dir: &Path, pattern: &AgentPattern) -> Vec<AgentDescriptor> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "agent directory not readable");
            return Vec::new();
        }
    };

    let mut agents = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable agent entry");
                continue;
            }
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::warn!(entry = ?name, "skipping agent with non UTF-8 name");
            continue;
        };
        if pattern.matches(name) {
            tracing::info!(agent = name, "autoloading agent");
            agents.push(AgentDescriptor {
                path: dir.join(name),
            });
        }
    }
    agents
}
