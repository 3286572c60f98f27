//! Protocol definition types describing domains, commands, and events.
//!
//! A [`ProtocolDefinition`] is the externally authored schema a dispatcher is
//! built against. The shape mirrors DevTools-style protocol files: an ordered
//! list of domains, each declaring commands (with optional parameter lists)
//! and optional events. Metadata that the dispatcher does not interpret, such
//! as parameter types or `$ref` links, is preserved verbatim.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Protocol version advertised by a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    /// Major version component.
    pub major: String,
    /// Minor version component.
    pub minor: String,
}

/// A complete protocol definition: an ordered sequence of domains.
///
/// # Example
///
/// ```
/// use courier_schema::ProtocolDefinition;
///
/// let definition = ProtocolDefinition::from_json_str(
///     r#"{"domains":[{"domain":"Page","commands":[{"name":"enable"}]}]}"#,
/// )
/// .expect("definition parses");
/// assert_eq!(definition.domains().len(), 1);
/// assert!(definition.domain("Page").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<ProtocolVersion>,
    #[serde(default)]
    domains: Vec<Domain>,
}

impl ProtocolDefinition {
    /// Creates a definition from an ordered list of domains.
    #[must_use]
    pub const fn new(domains: Vec<Domain>) -> Self {
        Self {
            version: None,
            domains,
        }
    }

    /// Sets the advertised protocol version.
    #[must_use]
    pub fn with_version(mut self, major: impl Into<String>, minor: impl Into<String>) -> Self {
        self.version = Some(ProtocolVersion {
            major: major.into(),
            minor: minor.into(),
        });
        self
    }

    /// Parses a definition from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] when the text is not a valid definition.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(SchemaError::Parse)
    }

    /// Parses a definition from a reader producing JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] when the content is not a valid
    /// definition.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SchemaError> {
        serde_json::from_reader(reader).map_err(SchemaError::Parse)
    }

    /// Reads and parses a definition file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Read`] when the file cannot be opened and
    /// [`SchemaError::Parse`] when its content is not a valid definition.
    pub fn from_path(location: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = location.as_ref();
        let file = File::open(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Returns the advertised protocol version, if any.
    #[must_use]
    pub const fn version(&self) -> Option<&ProtocolVersion> {
        self.version.as_ref()
    }

    /// Returns the domains in declared order.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Returns the first domain whose name matches.
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|domain| domain.name == name)
    }
}

/// A named grouping of commands and events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    #[serde(rename = "domain", alias = "name")]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    experimental: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    deprecated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    types: Option<Vec<Value>>,
    #[serde(default)]
    commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    events: Option<Vec<Event>>,
}

impl Domain {
    /// Creates a domain with the supplied name and no commands or events.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a command declaration.
    #[must_use]
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Appends an event declaration, creating the event list if absent.
    #[must_use]
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.get_or_insert_with(Vec::new).push(event);
        self
    }

    /// Returns the domain name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description, if declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns `true` when the domain is marked experimental.
    #[must_use]
    pub const fn is_experimental(&self) -> bool {
        self.experimental
    }

    /// Returns `true` when the domain is marked deprecated.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns the names of domains this one depends on.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the commands in declared order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the events in declared order; empty when none are declared.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.events.as_deref().unwrap_or_default()
    }
}

/// A request type within a domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Command {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<Parameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    returns: Option<Vec<Parameter>>,
}

impl Command {
    /// Creates a command that declares no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a parameter declaration, creating the list if absent.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    /// Returns the command name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description, if declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the declared parameters; empty when none are declared.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        self.parameters.as_deref().unwrap_or_default()
    }

    /// Returns the declared return values; empty when none are declared.
    #[must_use]
    pub fn returns(&self) -> &[Parameter] {
        self.returns.as_deref().unwrap_or_default()
    }
}

/// A named parameter of a command.
///
/// Only `name` and `optional` are interpreted. Everything else in the
/// declaration is kept in [`Parameter::metadata`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl Parameter {
    /// Creates a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            ..Self::default()
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns `true` when callers may omit the parameter.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the human-readable description, if declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns schema metadata the dispatcher does not interpret.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

/// An unsolicited notification type within a domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<Parameter>>,
}

impl Event {
    /// Creates an event declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the event name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description, if declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the declared payload fields; empty when none are declared.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        self.parameters.as_deref().unwrap_or_default()
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde's skip_serializing_if passes fields by reference"
)]
const fn is_false(value: &bool) -> bool {
    !*value
}
