//! Plugin descriptors

use crate::DescriptorError;
use serde::Serialize;
use std::collections::HashSet;

/// One predicate a plugin offers, selected on the command line as `--name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionMeta {
    pub name: String,
    pub description: String,
    /// Whether a separate following argument is this option's value
    pub takes_value: bool,
}

impl OptionMeta {
    pub fn flag(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            takes_value: false,
        }
    }

    pub fn with_value(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            takes_value: true,
        }
    }
}

/// Self-description of a plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginMeta {
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub options: Vec<OptionMeta>,
}

impl PluginMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            author: String::new(),
            description: String::new(),
            options: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_option(mut self, option: OptionMeta) -> Self {
        self.options.push(option);
        self
    }

    /// Look up an option by its command-line name
    pub fn option(&self, name: &str) -> Option<&OptionMeta> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Check the descriptor is usable for option binding.
    ///
    /// Option names must be non-empty, free of whitespace and `=`, and
    /// unique within the plugin.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.name.trim().is_empty() {
            return Err(DescriptorError::MissingField("plugin_name".to_string()));
        }

        let mut seen = HashSet::new();
        for opt in &self.options {
            let bad = opt.name.is_empty()
                || opt.name.starts_with('-')
                || opt.name.contains('=')
                || opt.name.chars().any(char::is_whitespace);
            if bad {
                return Err(DescriptorError::InvalidOptionName(opt.name.clone()));
            }
            if !seen.insert(opt.name.as_str()) {
                return Err(DescriptorError::DuplicateOption(opt.name.clone()));
            }
        }
        Ok(())
    }
}

/// An option the user switched on for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOption {
    pub option: OptionMeta,
    pub value: Option<String>,
    pub is_set: bool,
}

impl SelectedOption {
    pub fn new(option: OptionMeta, value: Option<String>) -> Self {
        Self { option, value, is_set: true }
    }

    pub fn name(&self) -> &str {
        &self.option.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The option's value, or `MissingValue` if none was given
    pub fn require_value(&self) -> crate::Result<&str> {
        self.value().ok_or_else(|| crate::PluginError::missing_value(self.name()))
    }
}
