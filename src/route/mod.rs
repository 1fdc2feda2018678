//! Route declarations - the finite set of action paths input can match

use serde::{Deserialize, Serialize};

/// Reserved path for the remote matcher's "no route matched" answer.
/// Never sent in the outbound schema set, but a legal match target.
pub const NOT_FOUND_PATH: &str = "notFound";

/// Parameter kind a matched action may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Enum,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Enum => "enum",
        }
    }
}

/// One named, typed parameter on an action path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamConfig {
    pub name: String,
    #[serde(default, rename = "type")]
    pub param_type: ParamType,
    /// Required iff `param_type == Enum`; must be non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_list: bool,
}

impl ParamConfig {
    /// Free-form string parameter (nullable on the wire).
    pub fn string(name: impl Into<String>) -> Self {
        Self { name: name.into(), param_type: ParamType::String, enum_options: None, is_list: false }
    }

    /// Closed-set parameter over the given options.
    pub fn enumerated<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            param_type: ParamType::Enum,
            enum_options: Some(options.into_iter().map(Into::into).collect()),
            is_list: false,
        }
    }

    /// Wrap the parameter in an ordered list.
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }
}

/// A declarable action path. Path uniqueness across a route table is the
/// caller's invariant; the core does not deduplicate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionPath {
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamConfig>,
}

impl ActionPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), params: Vec::new() }
    }

    pub fn with_param(mut self, param: ParamConfig) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(mut self, params: Vec<ParamConfig>) -> Self {
        self.params = params;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.path == NOT_FOUND_PATH
    }
}
