// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Function schema helpers
//!
//! Builds the JSON-schema objects that describe a tool's parameters and
//! responses to the chat model.

use serde_json::{Map, Value};

use crate::llm::provider::ToolInputSchema;

/// Helper to create a parameter or response schema
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn property(mut self, name: &str, schema: Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// Add a string property
    pub fn string(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "string", "description": description }),
            required,
        )
    }

    /// Add an integer property
    pub fn integer(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "integer", "description": description }),
            required,
        )
    }

    /// Add a number property (integer or float)
    pub fn number(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "number", "description": description }),
            required,
        )
    }

    /// Add a boolean property
    pub fn boolean(self, name: &str, description: &str, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "boolean", "description": description }),
            required,
        )
    }

    /// Add an array property whose items share one type
    pub fn array(self, name: &str, description: &str, item_type: &str, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({
                "type": "array",
                "description": description,
                "items": { "type": item_type }
            }),
            required,
        )
    }

    pub fn build(self) -> ToolInputSchema {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: Value::Object(self.properties),
            required: self.required,
        }
    }
}
