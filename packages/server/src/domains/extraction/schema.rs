//! Structured-output schema for entity extraction.
//!
//! The schema is derived from [`ExtractedEntities`] once, at startup, and the
//! resulting descriptor is handed to the extractor. Nothing re-derives it per
//! request.

use std::sync::Arc;

use openai_client::{JsonSchemaFormat, ResponseFormat, StructuredOutput};
use serde_json::Value;

use super::models::ExtractedEntities;

pub const SCHEMA_NAME: &str = "extracted_companies_people";
pub const SCHEMA_DESCRIPTION: &str = "Extracted companies and people from a webpage";

/// Named strict schema sent with every extraction request.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    name: String,
    description: String,
    schema: Arc<Value>,
}

impl SchemaDescriptor {
    /// Derive the schema for [`ExtractedEntities`].
    pub fn for_extracted_entities() -> Self {
        Self {
            name: SCHEMA_NAME.to_string(),
            description: SCHEMA_DESCRIPTION.to_string(),
            schema: Arc::new(ExtractedEntities::strict_schema()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat::json_schema(
            JsonSchemaFormat::strict(self.name.clone(), self.schema.as_ref().clone())
                .description(self.description.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(node: &Value) -> Vec<&str> {
        node["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    #[test]
    fn test_descriptor_metadata() {
        let descriptor = SchemaDescriptor::for_extracted_entities();

        assert_eq!(descriptor.name(), "extracted_companies_people");
        assert_eq!(
            descriptor.description(),
            "Extracted companies and people from a webpage"
        );

        let format = serde_json::to_value(descriptor.response_format()).unwrap();
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["name"], "extracted_companies_people");
    }

    #[test]
    fn test_schema_is_strict_all_the_way_down() {
        let descriptor = SchemaDescriptor::for_extracted_entities();
        let schema = descriptor.schema();

        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(required(schema).len(), 2);

        let company = &schema["properties"]["companies"]["items"];
        assert_eq!(company["additionalProperties"], false);
        for field in [
            "name",
            "founded_year",
            "industry",
            "revenue",
            "employees",
            "locations",
            "tech_stack",
        ] {
            assert!(required(company).contains(&field), "company.{field}");
        }

        let person = &schema["properties"]["people"]["items"];
        assert!(required(person).contains(&"contact"));

        let contact = &person["properties"]["contact"];
        assert_eq!(contact["additionalProperties"], false);
        assert_eq!(required(contact).len(), 6);
    }

    #[test]
    fn test_schema_has_no_refs_or_defaults() {
        let rendered = serde_json::to_string(SchemaDescriptor::for_extracted_entities().schema())
            .unwrap();

        assert!(!rendered.contains("$ref"));
        assert!(!rendered.contains("\"default\""));
        assert!(!rendered.contains("definitions"));
    }
}
