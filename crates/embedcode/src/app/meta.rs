//! YAML metadata carried in the body of an `embed-<lang>` fence.

use serde::Deserialize;

use crate::domain::errors::EmbedError;
use crate::domain::model::EmbedRequest;

#[derive(Debug, Default, Deserialize)]
struct EmbedMeta {
    #[serde(rename = "PATH", alias = "path")]
    path: Option<Scalar>,
    #[serde(rename = "LINES", alias = "lines")]
    lines: Option<Scalar>,
    #[serde(rename = "TITLE", alias = "title")]
    title: Option<Scalar>,
}

/// Authors write `LINES: 5` as readily as `LINES: "3-5"`; accept any scalar.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Bool(value) => value.to_string(),
        }
    }
}

/// Build an [`EmbedRequest`] from fence metadata such as:
///
/// ```yaml
/// PATH: "vault://src/main.rs"
/// LINES: "1-3,10"
/// TITLE: "entry point"
/// ```
pub fn parse_request(meta: &str, language: &str) -> Result<EmbedRequest, EmbedError> {
    let meta = if meta.trim().is_empty() {
        EmbedMeta::default()
    } else {
        let value: serde_yaml::Value = serde_yaml::from_str(meta)
            .map_err(|_| EmbedError::Malformed("invalid YAML".into()))?;
        match value {
            serde_yaml::Value::Null => EmbedMeta::default(),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
                .map_err(|err| EmbedError::Malformed(format!("invalid metadata: {err}")))?,
            _ => return Err(EmbedError::Malformed("metadata must be a mapping".into())),
        }
    };

    Ok(EmbedRequest {
        location: meta.path.map(Scalar::into_string),
        lines: meta.lines.map(Scalar::into_string),
        title: meta.title.map(Scalar::into_string),
        language: language.to_owned(),
    })
}
