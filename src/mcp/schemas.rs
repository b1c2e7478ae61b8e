//! JSON schema builders for MCP tools.

use crate::pipeline::SummarizeOptions;
use schemars::JsonSchema;
use serde_json::{Map, Value};

/// Build the schema describing the `summarize` tool input.
pub(crate) fn summarize_input_schema(defaults: &SummarizeOptions) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert("text".into(), string_schema("Document text to summarize"));
    properties.insert(
        "url".into(),
        string_schema("Web page to fetch and summarize; takes precedence over `text`"),
    );
    properties.insert(
        "chunk_size".into(),
        positive_integer_schema("Chunk width in characters", defaults.chunk_size),
    );
    properties.insert(
        "chunk_summary_size".into(),
        positive_integer_schema(
            "Target maximum summary length per chunk",
            defaults.chunk_summary_size,
        ),
    );

    finalize_object_schema(properties, &[])
}

/// Build the schema describing the `ask` tool input.
pub(crate) fn ask_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "context".into(),
        string_schema("Passage the answer must be extracted from"),
    );
    properties.insert("question".into(), string_schema("Question to answer"));

    finalize_object_schema(properties, &["context", "question"])
}

/// Schema for tools without parameters.
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

/// Derive an output schema from a structured tool result type.
pub(crate) fn output_schema<T: JsonSchema>() -> Map<String, Value> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(schema)) => schema,
        _ => empty_object_schema(),
    }
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn positive_integer_schema(description: &str, default: usize) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("integer".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert("minimum".into(), Value::from(1));
    schema.insert("default".into(), Value::from(default as u64));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|&key| Value::String(key.into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::format::SummarizeToolOutput;

    #[test]
    fn summarize_schema_advertises_configured_defaults() {
        let defaults = SummarizeOptions {
            chunk_size: 512,
            ..SummarizeOptions::default()
        };
        let schema = summarize_input_schema(&defaults);
        assert_eq!(schema["properties"]["chunk_size"]["default"], 512);
        assert_eq!(schema["properties"]["chunk_summary_size"]["default"], 128);
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn ask_schema_requires_context_and_question() {
        let schema = ask_input_schema();
        assert_eq!(
            schema["required"],
            Value::Array(vec!["context".into(), "question".into()])
        );
    }

    #[test]
    fn output_schema_lists_result_fields() {
        let schema = output_schema::<SummarizeToolOutput>();
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("summary"));
        assert!(properties.contains_key("failedChunks"));
    }
}
