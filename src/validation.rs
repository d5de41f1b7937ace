//! Request validation boundary.
//!
//! A [`Signature`] declares the parameter list of a guarded entry point once.
//! Each call binds its positional and keyword arguments onto that template,
//! and the resulting name → value mapping is handed to a [`Schema`]. If any
//! step fails the call is abandoned and an empty result is returned; the
//! guarded body never runs.

use crate::types::{Branch, ExtraData, BRANCH_KEY};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use thiserror::Error;
use tracing::warn;

/// Reasons a request was rejected at the boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Too many positional arguments: expected at most {expected}, got {got}")]
    TooManyArguments { expected: usize, got: usize },

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

impl ValidationError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Value>,
}

/// Ordered parameter template of a guarded entry point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameter without a default
    pub fn required(mut self, name: &str) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            default: None,
        });
        self
    }

    /// Parameter that falls back to `default` when not supplied
    pub fn optional(mut self, name: &str, default: Value) -> Self {
        self.parameters.push(Parameter {
            name: name.to_string(),
            default: Some(default),
        });
        self
    }

    /// Bind positional then keyword arguments. A keyword may override a
    /// positional binding of the same name.
    pub fn bind(
        &self,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> Result<Map<String, Value>, ValidationError> {
        if positional.len() > self.parameters.len() {
            return Err(ValidationError::TooManyArguments {
                expected: self.parameters.len(),
                got: positional.len(),
            });
        }

        let mut bound = Map::new();
        for (param, value) in self.parameters.iter().zip(positional) {
            bound.insert(param.name.clone(), value);
        }
        for (name, value) in keyword {
            if !self.parameters.iter().any(|p| p.name == name) {
                return Err(ValidationError::UnexpectedArgument(name));
            }
            bound.insert(name, value);
        }
        for param in &self.parameters {
            if bound.contains_key(&param.name) {
                continue;
            }
            match &param.default {
                Some(default) => {
                    bound.insert(param.name.clone(), default.clone());
                }
                None => return Err(ValidationError::MissingArgument(param.name.clone())),
            }
        }
        Ok(bound)
    }
}

/// Declared request shape. `deserialize` sees the fully bound arguments.
pub trait Schema: Sized {
    fn signature() -> Signature;

    fn deserialize(args: &Map<String, Value>) -> Result<Self, ValidationError>;
}

/// Fail-closed wrapper around an entry point returning a list.
pub struct ValidationBoundary<S: Schema> {
    signature: Signature,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> ValidationBoundary<S> {
    pub fn new() -> Self {
        Self {
            signature: S::signature(),
            _schema: PhantomData,
        }
    }

    /// Bind and validate without calling anything
    pub fn validate(
        &self,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
    ) -> Result<S, ValidationError> {
        let bound = self.signature.bind(positional, keyword)?;
        S::deserialize(&bound)
    }

    /// Run `call` only if the arguments validate; otherwise return an empty list.
    pub fn guard<T, E, F>(
        &self,
        positional: Vec<Value>,
        keyword: Map<String, Value>,
        call: F,
    ) -> Result<Vec<T>, E>
    where
        F: FnOnce(S) -> Result<Vec<T>, E>,
    {
        match self.validate(positional, keyword) {
            Ok(request) => call(request),
            Err(e) => {
                warn!(error = %e, "Error deserializing input arguments");
                Ok(Vec::new())
            }
        }
    }
}

impl<S: Schema> Default for ValidationBoundary<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub client_id: String,
    pub limit: usize,
    pub branch: Branch,
    pub extra_data: ExtraData,
}

impl Schema for RecommendationQuery {
    fn signature() -> Signature {
        Signature::new()
            .required("client_id")
            .required("limit")
            .optional("extra_data", Value::Object(Map::new()))
    }

    fn deserialize(args: &Map<String, Value>) -> Result<Self, ValidationError> {
        let client_id = match args.get("client_id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(ValidationError::invalid("client_id", "must not be empty"))
            }
            _ => return Err(ValidationError::invalid("client_id", "must be a string")),
        };

        let limit = match args.get("limit").and_then(Value::as_i64) {
            Some(n) if n >= 1 => usize::try_from(n)
                .map_err(|_| ValidationError::invalid("limit", "out of range"))?,
            Some(n) => {
                return Err(ValidationError::invalid(
                    "limit",
                    format!("{} is less than minimum value 1", n),
                ))
            }
            None => return Err(ValidationError::invalid("limit", "must be an integer")),
        };

        let extra_data = match args.get("extra_data") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => ExtraData::new(),
            Some(_) => return Err(ValidationError::invalid("extra_data", "must be a mapping")),
        };

        let branch = match extra_data.get(BRANCH_KEY) {
            None => Branch::default(),
            Some(Value::String(name)) => name
                .parse::<Branch>()
                .map_err(|e| ValidationError::invalid(BRANCH_KEY, e.to_string()))?,
            Some(_) => return Err(ValidationError::invalid(BRANCH_KEY, "must be a string")),
        };

        Ok(Self {
            client_id,
            limit,
            branch,
            extra_data,
        })
    }
}
