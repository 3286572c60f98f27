//! Precomputed lookup structure derived from a protocol definition.
//!
//! The [`SchemaIndex`] is built once when a dispatcher is constructed and is
//! never mutated afterwards. Every `(domain, command)` pair declared by the
//! definition has an entry, including commands that declare no parameters.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::warn;

use crate::SCHEMA_TARGET;
use crate::definition::{Command, Domain, Parameter, ProtocolDefinition};

/// Parameter schema for a single command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSchema {
    parameters: Vec<Parameter>,
    positions: HashMap<String, usize>,
}

impl CommandSchema {
    fn from_command(command: &Command) -> Self {
        let parameters = command.parameters().to_vec();
        let positions = parameters
            .iter()
            .enumerate()
            .map(|(position, parameter)| (parameter.name().to_owned(), position))
            .collect();
        Self {
            parameters,
            positions,
        }
    }

    /// Returns the declared parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Looks up a declared parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.positions
            .get(name)
            .and_then(|position| self.parameters.get(*position))
    }

    /// Returns the parameters that are not marked optional.
    pub fn required_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|parameter| !parameter.is_optional())
    }

    /// Returns `true` when the command declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// The commands declared by one domain, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainCommands {
    order: Vec<String>,
    commands: HashMap<String, CommandSchema>,
}

impl DomainCommands {
    fn from_domain(domain: &Domain) -> Self {
        let mut index = Self::default();
        for command in domain.commands() {
            match index.commands.entry(command.name().to_owned()) {
                Entry::Occupied(_) => {
                    warn!(
                        target: SCHEMA_TARGET,
                        domain = domain.name(),
                        command = command.name(),
                        "ignoring duplicate command declaration"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(CommandSchema::from_command(command));
                    index.order.push(command.name().to_owned());
                }
            }
        }
        index
    }

    /// Looks up a command's parameter schema.
    #[must_use]
    pub fn get(&self, command: &str) -> Option<&CommandSchema> {
        self.commands.get(command)
    }

    /// Returns `true` when the domain declares the command.
    #[must_use]
    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    /// Returns the command names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns `(name, schema)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandSchema)> {
        self.order.iter().filter_map(|name| {
            self.commands
                .get(name)
                .map(|schema| (name.as_str(), schema))
        })
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when the domain declares no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone)]
struct DomainEntry {
    commands: DomainCommands,
    events: Vec<String>,
}

/// Immutable lookup from domain and command names to parameter schemas.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use courier_schema::{Command, Domain, Parameter, ProtocolDefinition, SchemaIndex};
///
/// let definition = ProtocolDefinition::new(vec![
///     Domain::new("Page").with_command(
///         Command::new("navigate").with_parameter(Parameter::required("url")),
///     ),
/// ]);
/// let index = SchemaIndex::new(Arc::new(definition));
/// assert_eq!(index.domain_command_names("Page"), Some(vec!["navigate"]));
/// assert!(index.domain_commands("Network").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    definition: Arc<ProtocolDefinition>,
    domains: HashMap<String, DomainEntry>,
}

impl SchemaIndex {
    /// Builds the index from a shared protocol definition.
    ///
    /// When a domain name is declared twice the first declaration wins, which
    /// keeps the index consistent with [`SchemaIndex::domain_definition`].
    #[must_use]
    pub fn new(definition: Arc<ProtocolDefinition>) -> Self {
        let mut domains = HashMap::with_capacity(definition.domains().len());
        for domain in definition.domains() {
            match domains.entry(domain.name().to_owned()) {
                Entry::Occupied(_) => {
                    warn!(
                        target: SCHEMA_TARGET,
                        domain = domain.name(),
                        "ignoring duplicate domain declaration"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(DomainEntry {
                        commands: DomainCommands::from_domain(domain),
                        events: domain
                            .events()
                            .iter()
                            .map(|event| event.name().to_owned())
                            .collect(),
                    });
                }
            }
        }
        Self {
            definition,
            domains,
        }
    }

    /// Returns the definition the index was built from.
    #[must_use]
    pub const fn definition(&self) -> &Arc<ProtocolDefinition> {
        &self.definition
    }

    /// Returns `true` when the domain is declared.
    #[must_use]
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Returns the commands of a domain, or `None` for an unknown domain.
    #[must_use]
    pub fn domain_commands(&self, domain: &str) -> Option<&DomainCommands> {
        self.domains.get(domain).map(|entry| &entry.commands)
    }

    /// Looks up a command's parameter schema.
    #[must_use]
    pub fn command(&self, domain: &str, command: &str) -> Option<&CommandSchema> {
        self.domain_commands(domain)
            .and_then(|commands| commands.get(command))
    }

    /// Returns a domain's command names in declaration order.
    #[must_use]
    pub fn domain_command_names(&self, domain: &str) -> Option<Vec<&str>> {
        self.domain_commands(domain)
            .map(|commands| commands.names().collect())
    }

    /// Returns a domain's event names in declaration order.
    ///
    /// A known domain without an `events` list yields an empty vector.
    #[must_use]
    pub fn domain_event_names(&self, domain: &str) -> Option<Vec<&str>> {
        self.domains
            .get(domain)
            .map(|entry| entry.events.iter().map(String::as_str).collect())
    }

    /// Returns the first domain declaration with a matching name.
    #[must_use]
    pub fn domain_definition(&self, domain: &str) -> Option<&Domain> {
        self.definition.domain(domain)
    }

    /// Returns the declared domain names in declaration order.
    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        let mut seen = Vec::new();
        self.definition
            .domains()
            .iter()
            .map(Domain::name)
            .filter(move |name| {
                if seen.contains(name) {
                    false
                } else {
                    seen.push(*name);
                    true
                }
            })
    }
}
