use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BindingError, BindingResult};

/// Chart configuration object.
///
/// Options stay an opaque JSON tree: the chart library owns their schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartOptions(Value);

impl Default for ChartOptions {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl ChartOptions {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(input: &str) -> BindingResult<Self> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            BindingError::InvalidData(format!("failed to parse chart options json: {e}"))
        })?;
        if !value.is_object() {
            return Err(BindingError::InvalidData(
                "chart options must be a json object".to_owned(),
            ));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a nested option by dotted path, e.g. `plugins.legend.display`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.0, |node, key| node.as_object()?.get(key))
    }

    /// Sets a nested option by dotted path, creating intermediate objects.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut node = &mut self.0;
        let mut keys = path.split('.').peekable();
        while let Some(key) = keys.next() {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return;
            };
            if keys.peek().is_none() {
                map.insert(key.to_owned(), value.into());
                return;
            }
            node = map
                .entry(key.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }

    /// Recursively merges `overrides` into these options; later values win.
    #[must_use]
    pub fn merge(mut self, overrides: &ChartOptions) -> Self {
        merge_value(&mut self.0, &overrides.0);
        self
    }
}

impl From<Value> for ChartOptions {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn merge_value(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
