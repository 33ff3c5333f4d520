//! Result schema contract.
//!
//! The contract is described once as data ([`SchemaNode`]) and consumed three
//! ways: rendered as a Gemini `responseSchema`, rendered as a JSON Schema for
//! OpenAI-compatible structured outputs, and walked by the local validator.

use super::models::{SkinChroma, SkinHue, SkinValue};
use crate::seasons::SeasonId;
use lazy_static::lazy_static;
use serde_json::{json, Map, Value};

/// One node of the contract.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object {
        description: Option<&'static str>,
        properties: Vec<Property>,
    },
    String {
        description: Option<&'static str>,
        allowed: Option<Vec<&'static str>>,
        /// Anchored regular expression the value must match.
        pattern: Option<&'static str>,
    },
    Number {
        description: Option<&'static str>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Integer {
        description: Option<&'static str>,
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub required: bool,
    pub node: SchemaNode,
}

impl Property {
    fn required(name: &'static str, node: SchemaNode) -> Self {
        Self {
            name,
            required: true,
            node,
        }
    }
}

/// Pattern of the `technicalCode` field.
pub const TECHNICAL_CODE_PATTERN: &str = r"^\d+(\.\d+)?$";

pub const MIN_NATURAL_LEVEL: i64 = 1;
pub const MAX_NATURAL_LEVEL: i64 = 10;

fn text(description: &'static str) -> SchemaNode {
    SchemaNode::String {
        description: Some(description),
        allowed: None,
        pattern: None,
    }
}

fn one_of(description: Option<&'static str>, allowed: Vec<&'static str>) -> SchemaNode {
    SchemaNode::String {
        description,
        allowed: Some(allowed),
        pattern: None,
    }
}

fn build_contract() -> SchemaNode {
    let skin_analysis = SchemaNode::Object {
        description: Some("Munsell attributes of the skin."),
        properties: vec![
            Property::required(
                "hue",
                one_of(None, SkinHue::ALL.iter().map(|h| h.as_str()).collect()),
            ),
            Property::required(
                "value",
                one_of(None, SkinValue::ALL.iter().map(|v| v.as_str()).collect()),
            ),
            Property::required(
                "chroma",
                one_of(None, SkinChroma::ALL.iter().map(|c| c.as_str()).collect()),
            ),
        ],
    };

    let hair_diagnosis = SchemaNode::Object {
        description: Some("Natural hair level and dye formulation."),
        properties: vec![
            Property::required(
                "naturalLevel",
                SchemaNode::Integer {
                    description: Some("Estimated natural hair level (1-10)"),
                    minimum: Some(MIN_NATURAL_LEVEL),
                    maximum: Some(MAX_NATURAL_LEVEL),
                },
            ),
            Property::required(
                "undertone",
                text("Underlying pigment (e.g., Red, Orange, Yellow)"),
            ),
            Property::required(
                "recommendedFormula",
                text("Name of the recommended color direction (e.g. Ash Blonde)"),
            ),
            Property::required(
                "technicalCode",
                SchemaNode::String {
                    description: Some("Technical color code recommendation (e.g., 7.1)"),
                    allowed: None,
                    pattern: Some(TECHNICAL_CODE_PATTERN),
                },
            ),
            Property::required(
                "developerVol",
                text("Recommended developer volume (e.g., 20 Vol)"),
            ),
            Property::required(
                "explanation",
                text("Why this formula neutralizes or enhances the user."),
            ),
        ],
    };

    SchemaNode::Object {
        description: None,
        properties: vec![
            Property::required(
                "seasonId",
                one_of(
                    Some("The calculated 12-season color analysis result."),
                    SeasonId::ALL.iter().map(|s| s.as_str()).collect(),
                ),
            ),
            Property::required(
                "confidence",
                SchemaNode::Number {
                    description: Some("Confidence level of the analysis between 0 and 1."),
                    minimum: Some(0.0),
                    maximum: Some(1.0),
                },
            ),
            Property::required(
                "reasoning",
                text("Explanation of why this season was chosen based on skin, eyes, and hair."),
            ),
            Property::required("skinAnalysis", skin_analysis),
            Property::required("hairDiagnosis", hair_diagnosis),
        ],
    }
}

lazy_static! {
    static ref CONTRACT: SchemaNode = build_contract();
}

/// The result schema contract.
pub fn contract() -> &'static SchemaNode {
    &CONTRACT
}

/// Wire dialect a schema is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Gemini `responseSchema` (OpenAPI subset, uppercase type names).
    Gemini,
    /// JSON Schema accepted by OpenAI-compatible strict structured outputs.
    JsonSchema,
}

impl SchemaNode {
    pub fn render(&self, dialect: SchemaDialect) -> Value {
        let mut out = Map::new();
        let type_name = |lower: &str| match dialect {
            SchemaDialect::Gemini => lower.to_ascii_uppercase(),
            SchemaDialect::JsonSchema => lower.to_string(),
        };

        match self {
            SchemaNode::Object {
                description,
                properties,
            } => {
                out.insert("type".into(), json!(type_name("object")));
                insert_description(&mut out, *description);

                let mut props = Map::new();
                for property in properties {
                    props.insert(property.name.into(), property.node.render(dialect));
                }
                out.insert("properties".into(), Value::Object(props));

                let required: Vec<&str> = properties
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| p.name)
                    .collect();
                out.insert("required".into(), json!(required));

                match dialect {
                    SchemaDialect::Gemini => {
                        let ordering: Vec<&str> = properties.iter().map(|p| p.name).collect();
                        out.insert("propertyOrdering".into(), json!(ordering));
                    }
                    SchemaDialect::JsonSchema => {
                        out.insert("additionalProperties".into(), json!(false));
                    }
                }
            }
            SchemaNode::String {
                description,
                allowed,
                pattern,
            } => {
                out.insert("type".into(), json!(type_name("string")));
                insert_description(&mut out, *description);
                if let Some(allowed) = allowed {
                    out.insert("enum".into(), json!(allowed));
                }
                // Gemini does not accept `pattern`; the local validator still enforces it.
                if let (Some(pattern), SchemaDialect::JsonSchema) = (pattern, dialect) {
                    out.insert("pattern".into(), json!(pattern));
                }
            }
            SchemaNode::Number {
                description,
                minimum,
                maximum,
            } => {
                out.insert("type".into(), json!(type_name("number")));
                insert_description(&mut out, *description);
                insert_bounds(&mut out, *minimum, *maximum);
            }
            SchemaNode::Integer {
                description,
                minimum,
                maximum,
            } => {
                out.insert("type".into(), json!(type_name("integer")));
                insert_description(&mut out, *description);
                insert_bounds(&mut out, *minimum, *maximum);
            }
        }

        Value::Object(out)
    }
}

fn insert_description(out: &mut Map<String, Value>, description: Option<&str>) {
    if let Some(description) = description {
        out.insert("description".into(), json!(description));
    }
}

fn insert_bounds<T: Into<Value>>(out: &mut Map<String, Value>, min: Option<T>, max: Option<T>) {
    if let Some(min) = min {
        out.insert("minimum".into(), min.into());
    }
    if let Some(max) = max {
        out.insert("maximum".into(), max.into());
    }
}
