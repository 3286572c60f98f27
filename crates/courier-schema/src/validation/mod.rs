//! Presence validation of caller-supplied parameters.
//!
//! Validation only checks that the domain and command exist and that every
//! required parameter is present in the bag. Value types, ranges, and extra
//! undeclared keys are never inspected.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::index::SchemaIndex;

/// Caller-supplied parameter bag keyed by parameter name.
pub type Params = Map<String, Value>;

impl SchemaIndex {
    /// Decides whether a call to `domain.command` with `params` may proceed.
    ///
    /// A key that is present counts as supplied, including an explicit JSON
    /// `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownNamespace`] for an undeclared domain,
    /// [`ValidationError::UnknownMethod`] for an undeclared command, and
    /// [`ValidationError::MissingParameters`] listing every absent required
    /// parameter in declaration order.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use courier_schema::{
    ///     Command, Domain, Params, Parameter, ProtocolDefinition, SchemaIndex,
    /// };
    ///
    /// let definition = ProtocolDefinition::new(vec![Domain::new("Page").with_command(
    ///     Command::new("navigate").with_parameter(Parameter::required("url")),
    /// )]);
    /// let index = SchemaIndex::new(Arc::new(definition));
    ///
    /// let error = index
    ///     .validate("Page", "navigate", &Params::new())
    ///     .expect_err("url is required");
    /// assert_eq!(error.to_string(), "navigate requires 'url' parameter");
    /// ```
    pub fn validate(
        &self,
        domain: &str,
        command: &str,
        params: &Params,
    ) -> Result<(), ValidationError> {
        let Some(commands) = self.domain_commands(domain) else {
            return Err(ValidationError::unknown_namespace(domain));
        };
        let Some(schema) = commands.get(command) else {
            return Err(ValidationError::unknown_method(domain, command));
        };
        if schema.is_empty() {
            return Ok(());
        }

        let missing: Vec<String> = schema
            .required_parameters()
            .filter(|parameter| !params.contains_key(parameter.name()))
            .map(|parameter| parameter.name().to_owned())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::missing_parameters(command, missing))
        }
    }
}
