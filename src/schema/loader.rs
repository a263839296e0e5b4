//! Model loader for declaration documents on disk
//!
//! - Declarations stored at `<root>/models/*.json`
//! - One file per model type
//! - Nested references resolve regardless of file order
//! - A model name can be registered only once

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::declaration::ModelDeclaration;
use super::errors::{LoaderError, LoaderResult, ModelError, ModelResult};
use super::model::ModelType;
use crate::observability::{Event, Logger};

/// Reads declaration files and keeps the declared model types by name.
pub struct SchemaLoader {
    /// Directory containing declaration files
    model_dir: PathBuf,
    models: HashMap<String, ModelType>,
}

impl SchemaLoader {
    /// Creates a loader for `<root>/models/`.
    pub fn new(root: &Path) -> Self {
        Self {
            model_dir: root.join("models"),
            models: HashMap::new(),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Loads every `.json` declaration in the model directory.
    ///
    /// Returns the number of model types declared by this call. A missing
    /// directory is created and yields zero.
    pub fn load_all(&mut self) -> LoaderResult<usize> {
        self.load_declarations().map_err(|e| {
            Logger::error(
                Event::SchemasLoadFailed.as_str(),
                &[("reason", e.to_string().as_str())],
            );
            e
        })
    }

    fn load_declarations(&mut self) -> LoaderResult<usize> {
        if !self.model_dir.exists() {
            fs::create_dir_all(&self.model_dir).map_err(|source| LoaderError::Io {
                path: self.model_dir.clone(),
                source,
            })?;
            return Ok(0);
        }

        let entries = fs::read_dir(&self.model_dir).map_err(|source| LoaderError::Io {
            path: self.model_dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoaderError::Io {
                path: self.model_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut pending = Vec::with_capacity(paths.len());
        for path in paths {
            let declaration = Self::read_declaration(&path)?;
            pending.push((path, declaration));
        }

        let loaded = self.declare_in_order(pending)?;

        let count = loaded.to_string();
        let dir = self.model_dir.display().to_string();
        Logger::info(
            Event::SchemasLoaded.as_str(),
            &[("count", count.as_str()), ("dir", dir.as_str())],
        );
        Ok(loaded)
    }

    fn read_declaration(path: &Path) -> LoaderResult<ModelDeclaration> {
        let content = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ModelDeclaration::from_json(&content).map_err(|source| LoaderError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Declares pending documents once every model they nest is known.
    fn declare_in_order(
        &mut self,
        mut pending: Vec<(PathBuf, ModelDeclaration)>,
    ) -> LoaderResult<usize> {
        let mut loaded = 0;

        while !pending.is_empty() {
            let waiting: Vec<String> = pending.iter().map(|(_, d)| d.name.clone()).collect();
            let ready = pending.iter().position(|(_, decl)| {
                decl.dependencies()
                    .iter()
                    .all(|dep| self.models.contains_key(dep) || !waiting.contains(dep))
            });

            let Some(idx) = ready else {
                let (path, decl) = &pending[0];
                return Err(LoaderError::Declaration {
                    path: path.clone(),
                    source: ModelError::misuse(format!(
                        "model '{}' takes part in a circular nesting: {}",
                        decl.name,
                        waiting.join(", ")
                    )),
                });
            };

            let (path, decl) = pending.remove(idx);
            self.declare(&decl)
                .map_err(|source| LoaderError::Declaration { path, source })?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Declares a model type from a document and registers it.
    pub fn declare(&mut self, declaration: &ModelDeclaration) -> ModelResult<ModelType> {
        let model_type = declaration.declare(&|name: &str| self.models.get(name).cloned())?;
        self.register(model_type.clone())?;
        Ok(model_type)
    }

    /// Registers a model type built in code.
    pub fn register(&mut self, model_type: ModelType) -> ModelResult<()> {
        if self.models.contains_key(model_type.name()) {
            return Err(ModelError::misuse(format!(
                "model '{}' is already declared",
                model_type.name()
            )));
        }
        self.models.insert(model_type.name().to_string(), model_type);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ModelType> {
        self.models.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn all_models(&self) -> impl Iterator<Item = &ModelType> {
        self.models.values()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }
}
