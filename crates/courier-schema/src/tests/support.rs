//! Shared protocol fixtures for schema tests.

use std::sync::Arc;

use rstest::fixture;

use crate::{ProtocolDefinition, SchemaIndex};

/// DevTools-style definition exercising the interesting shapes: a command
/// without parameters, mixed required/optional parameters, an all-optional
/// parameter list, a domain without events, and a domain without commands.
pub(crate) const PAGE_PROTOCOL: &str = r#"{
    "version": {"major": "1", "minor": "3"},
    "domains": [
        {
            "domain": "Page",
            "description": "Actions and events related to the inspected page.",
            "commands": [
                {"name": "enable"},
                {
                    "name": "navigate",
                    "parameters": [
                        {"name": "url", "type": "string"},
                        {"name": "referrer", "type": "string", "optional": true}
                    ]
                },
                {
                    "name": "setDeviceMetrics",
                    "parameters": [
                        {"name": "width", "type": "integer"},
                        {"name": "mobile", "type": "boolean", "optional": true},
                        {"name": "height", "type": "integer"}
                    ]
                }
            ],
            "events": [{"name": "loaded"}, {"name": "frameNavigated"}]
        },
        {
            "domain": "Network",
            "experimental": true,
            "commands": [
                {
                    "name": "enable",
                    "parameters": [{"name": "maxBufferSize", "type": "integer", "optional": true}]
                }
            ]
        },
        {"domain": "Empty"}
    ]
}"#;

/// Parsed form of [`PAGE_PROTOCOL`].
pub(crate) fn page_definition() -> ProtocolDefinition {
    ProtocolDefinition::from_json_str(PAGE_PROTOCOL).expect("fixture protocol parses")
}

/// Index built over [`PAGE_PROTOCOL`].
#[fixture]
pub(crate) fn page_index() -> SchemaIndex {
    SchemaIndex::new(Arc::new(page_definition()))
}
