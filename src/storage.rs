use crate::config::Config;
use crate::error::StoreError;
use crate::models::{Environment, StoredRequest, Variable};

/// Persistence capability for stored requests and environments.
///
/// Requests and environments are addressed by opaque ids.
pub trait Store {
    fn load_request(&self, id: &str) -> Result<StoredRequest, StoreError>;
    fn save_request(&mut self, request: StoredRequest);
    fn environment(&self, id: &str) -> Option<&Environment>;
    fn environments(&self) -> &[Environment];
    fn save_environment(&mut self, environment: Environment);
}

/// In-memory store, seeded from config
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    requests: Vec<StoredRequest>,
    environments: Vec<Environment>,
    current_env: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        MemoryStore {
            requests: config.requests.clone(),
            environments: config.environments.clone(),
            current_env: None,
        }
    }

    pub fn requests(&self) -> &[StoredRequest] {
        &self.requests
    }

    /// Select the active environment by id or name; `None` clears it
    pub fn select_environment(&mut self, id_or_name: Option<&str>) -> Result<(), StoreError> {
        let Some(wanted) = id_or_name else {
            self.current_env = None;
            return Ok(());
        };
        let index = self
            .environments
            .iter()
            .position(|e| e.id == wanted)
            .or_else(|| self.environments.iter().position(|e| e.name == wanted))
            .ok_or_else(|| StoreError::NotFound {
                kind: "environment",
                id: wanted.to_string(),
            })?;
        self.current_env = Some(index);
        Ok(())
    }

    /// Get current environment
    pub fn current_environment(&self) -> Option<&Environment> {
        self.current_env.and_then(|i| self.environments.get(i))
    }

    /// Active bindings; empty when no environment is selected
    pub fn bindings(&self) -> &[Variable] {
        self.current_environment()
            .map(|env| env.variables.as_slice())
            .unwrap_or(&[])
    }
}

impl Store for MemoryStore {
    fn load_request(&self, id: &str) -> Result<StoredRequest, StoreError> {
        self.requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "request",
                id: id.to_string(),
            })
    }

    fn save_request(&mut self, request: StoredRequest) {
        match self.requests.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => *existing = request,
            None => self.requests.push(request),
        }
    }

    fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    fn environments(&self) -> &[Environment] {
        &self.environments
    }

    fn save_environment(&mut self, environment: Environment) {
        match self.environments.iter_mut().find(|e| e.id == environment.id) {
            Some(existing) => *existing = environment,
            None => self.environments.push(environment),
        }
    }
}
