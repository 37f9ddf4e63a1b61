// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use erniebot_agent::error::{AgentError, Result};
use erniebot_agent::llm::provider::FunctionDefinition;
use erniebot_agent::tools::{
    CalculatorTool, SchemaBuilder, Tool, ToolExecutor, ToolOutput, ToolRegistry,
};

/// Tool that always fails, through an anyhow error converted at the edge
struct BrokenTool;

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn definition(&self) -> FunctionDefinition {
        FunctionDefinition {
            name: "broken".to_string(),
            description: "always fails".to_string(),
            parameters: SchemaBuilder::new().build(),
            responses: None,
        }
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Err(anyhow::anyhow!("backend unavailable").into())
    }
}

#[tokio::test]
async fn test_calculator_formula_result() {
    let out = CalculatorTool::new()
        .execute(serde_json::json!({"math_formula": "(3+5)*2"}))
        .await
        .unwrap();
    assert_eq!(out, serde_json::json!({"formula_result": 16}));
}

#[tokio::test]
async fn test_calculator_power_and_float() {
    let out = CalculatorTool::new()
        .execute(serde_json::json!({"math_formula": "2^10"}))
        .await
        .unwrap();
    assert_eq!(out["formula_result"], serde_json::json!(1024.0));

    let out = CalculatorTool::new()
        .execute(serde_json::json!({"math_formula": "10.0 / 4"}))
        .await
        .unwrap();
    assert_eq!(out["formula_result"], serde_json::json!(2.5));
}

#[test]
fn test_calculator_definition_serializes() {
    let value = serde_json::to_value(CalculatorTool::new().definition()).unwrap();
    assert_eq!(value["name"], "calculator");
    assert_eq!(value["parameters"]["type"], "object");
    assert_eq!(value["parameters"]["properties"]["math_formula"]["type"], "string");
    assert_eq!(value["responses"]["properties"]["formula_result"]["type"], "number");
}

#[tokio::test]
async fn test_executor_captures_tool_failure() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(BrokenTool));
    let executor = ToolExecutor::new(registry);

    let output = executor.execute("broken", serde_json::json!({})).await.unwrap();
    assert_eq!(
        output,
        ToolOutput::Error("Tool execution failed: backend unavailable".to_string())
    );
    assert_eq!(
        output.to_content(),
        r#"{"error":"Tool execution failed: backend unavailable"}"#
    );
}

#[tokio::test]
async fn test_executor_unknown_tool() {
    let executor = ToolExecutor::new(ToolRegistry::with_builtins());
    let err = executor
        .execute("search", serde_json::json!({"q": "x"}))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::ToolNotFound(_)));
}

#[test]
fn test_executor_definitions_sorted() {
    let mut executor = ToolExecutor::new(ToolRegistry::with_builtins());
    executor.registry_mut().register(Arc::new(BrokenTool));

    let names: Vec<String> = executor
        .tool_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["broken", "calculator"]);
}
