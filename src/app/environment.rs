//! Environment editing through an editable key-value list

use uuid::Uuid;

use crate::error::StoreError;
use crate::kv_list::EditableKeyValueList;
use crate::models::{Environment, KeyValueEntry};
use crate::storage::Store;

/// Draft of a new or existing environment
#[derive(Clone, Debug)]
pub struct EnvironmentEditor {
    pub id: Option<String>,
    pub name: String,
    pub variables: EditableKeyValueList,
}

impl Default for EnvironmentEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentEditor {
    pub fn new() -> Self {
        EnvironmentEditor {
            id: None,
            name: String::new(),
            variables: EditableKeyValueList::empty(),
        }
    }

    /// Start editing an existing environment
    pub fn edit(env: &Environment) -> Self {
        let rows = env
            .variables
            .iter()
            .map(|v| KeyValueEntry::new(v.key.clone(), v.value.clone()))
            .collect();
        EnvironmentEditor {
            id: Some(env.id.clone()),
            name: env.name.clone(),
            variables: EditableKeyValueList::new(rows),
        }
    }

    /// Validate and collapse the draft into an environment.
    ///
    /// Rows with a blank key are dropped. Duplicate keys keep the position of
    /// the first occurrence and the value of the last. Disabled rows still
    /// count as bindings.
    pub fn finish(&self) -> Result<Environment, StoreError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let id = self
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut env = Environment::new(id, name);
        for row in self.variables.entries() {
            let key = row.key.trim();
            if key.is_empty() {
                continue;
            }
            env.set(key, row.value.clone());
        }
        Ok(env)
    }

    /// Finish and persist
    pub fn save(&self, store: &mut impl Store) -> Result<Environment, StoreError> {
        let env = self.finish()?;
        store.save_environment(env.clone());
        tracing::info!(id = %env.id, name = %env.name, variables = env.variables.len(), "Environment saved");
        Ok(env)
    }
}

impl From<&Environment> for EnvironmentEditor {
    fn from(env: &Environment) -> Self {
        Self::edit(env)
    }
}
