use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::access::Keywords;
use crate::services::paths::{FieldError, PathPart};

/// Handler names, logged as the `handler` field of request events.
pub const GET_PATHS: &str = "get_paths";
pub const GET_PATH_KWARGS: &str = "get_path_kwargs";
pub const GET_PATH_NAME: &str = "get_path_name";
pub const POST_PATH_NAME: &str = "post_path_name";

/// Query parameters of the path listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsQuery {
    /// Return the name to template table instead of the names.
    #[serde(default)]
    pub templates: bool,
}

/// Keywords required by a path name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathKeywords {
    pub name: String,
    pub kwargs: Vec<String>,
}

/// JSON body of a path resolution request.
///
/// Keyword values may be JSON strings, numbers or booleans; they are passed
/// on as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathBody {
    #[serde(default)]
    pub kwargs: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub part: PathPart,
    #[serde(default)]
    pub exists: bool,
}

impl PathBody {
    pub fn keywords(&self) -> Result<Keywords, FieldError> {
        let Some(kwargs) = &self.kwargs else {
            return Ok(Keywords::new());
        };
        kwargs
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => {
                        return Err(FieldError::new(
                            "kwargs",
                            format!("value for '{}' must be a string or number", key),
                        ))
                    }
                };
                Ok((key.clone(), text))
            })
            .collect()
    }
}

/// Query-string parameters of `GET /paths/{name}`.
///
/// `part` and `exists` are control parameters; every other pair is a path
/// keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    pub kwargs: Keywords,
    pub part: PathPart,
    pub exists: bool,
}

impl PathParams {
    pub fn from_query(mut query: BTreeMap<String, String>) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let part = match query.remove("part") {
            Some(raw) => raw.parse::<PathPart>().unwrap_or_else(|e| {
                errors.push(FieldError::new("part", e));
                PathPart::default()
            }),
            None => PathPart::default(),
        };

        let exists = match query.remove("exists") {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                errors.push(FieldError::new(
                    "exists",
                    format!("value '{}' could not be parsed to a boolean", raw),
                ));
                false
            }),
            None => false,
        };

        if errors.is_empty() {
            Ok(Self {
                kwargs: query,
                part,
                exists,
            })
        } else {
            Err(errors)
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
