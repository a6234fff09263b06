use crate::domain::model::{Context, ContextType};
use crate::domain::ports::{ContextDirectory, ContextStore};
use crate::utils::error::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each context as `<base_path>/<name>.toml`.
#[derive(Debug, Clone)]
pub struct FsContextStore {
    base_path: PathBuf,
}

impl FsContextStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.toml", name))
    }

    fn read(&self, path: &Path, name: &str) -> Result<Context, StoreError> {
        let content = fs::read_to_string(path)?;
        let mut context: Context =
            toml::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        if context.name.is_empty() {
            context.name = name.to_string();
        } else if context.name != name {
            return Err(StoreError::NameMismatch {
                path: path.display().to_string(),
                declared: context.name,
                expected: name.to_string(),
            });
        }
        Ok(context)
    }
}

impl ContextStore for FsContextStore {
    fn load(&self, name: &str) -> Result<Context, StoreError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }
        tracing::debug!("Loading context from {}", path.display());
        self.read(&path, name)
    }

    /// Writes to a temporary file next to the target and renames it into place.
    fn save(&self, context: &Context) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base_path)?;

        let content =
            toml::to_string_pretty(context).map_err(|source| StoreError::Serialize {
                name: context.name.clone(),
                source,
            })?;

        let path = self.path_for(&context.name);
        let tmp_path = self.base_path.join(format!(".{}.toml.tmp", context.name));
        fs::write(&tmp_path, content)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!("Saved context {} to {}", context.name, path.display());
        Ok(())
    }
}

impl ContextDirectory for FsContextStore {
    fn contexts_of_type(&self, context_type: ContextType) -> Result<Vec<Context>, StoreError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut contexts = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            match self.read(&path, name) {
                Ok(context) if context.context_type == context_type => contexts.push(context),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable context {}: {}", path.display(), e),
            }
        }

        contexts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contexts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BindingRecord, ProviderBinding};
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsContextStore::new(temp_dir.path().join("contexts"));

        let mut server = Context::new("server1", ContextType::Server);
        server
            .bind(
                "http",
                BindingRecord::Provider(ProviderBinding {
                    service_type: "nginx".to_string(),
                    properties: [("http_port".to_string(), "8080".to_string())].into(),
                }),
            )
            .unwrap();
        store.save(&server).unwrap();

        assert_eq!(store.load("server1").unwrap(), server);
        assert!(!temp_dir
            .path()
            .join("contexts/.server1.toml.tmp")
            .exists());
    }

    #[test]
    fn test_save_keeps_unowned_settings() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsContextStore::new(temp_dir.path());
        std::fs::write(
            store.path_for("site1"),
            "type = \"site\"\nuri = \"example.com\"\n\n[backup]\nkeep = 3\n",
        )
        .unwrap();

        let site = store.load("site1").unwrap();
        store.save(&site).unwrap();

        let reloaded = store.load("site1").unwrap();
        assert_eq!(reloaded, site);
        assert_eq!(reloaded.extra["uri"].as_str(), Some("example.com"));
        assert_eq!(reloaded.extra["backup"]["keep"].as_integer(), Some(3));
    }

    #[test]
    fn test_load_missing_context() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsContextStore::new(temp_dir.path());
        assert!(matches!(
            store.load("nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_name_comes_from_file_stem() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("site1.toml"), "type = \"site\"\n").unwrap();
        std::fs::write(
            temp_dir.path().join("site2.toml"),
            "name = \"other\"\ntype = \"site\"\n",
        )
        .unwrap();

        let store = FsContextStore::new(temp_dir.path());
        assert_eq!(store.load("site1").unwrap().name, "site1");
        assert!(matches!(
            store.load("site2"),
            Err(StoreError::NameMismatch { .. })
        ));
    }

    #[test]
    fn test_contexts_of_type() {
        let temp_dir = TempDir::new().unwrap();
        let store = FsContextStore::new(temp_dir.path());
        store.save(&Context::new("server2", ContextType::Server)).unwrap();
        store.save(&Context::new("server1", ContextType::Server)).unwrap();
        store.save(&Context::new("platform1", ContextType::Platform)).unwrap();
        std::fs::write(temp_dir.path().join("broken.toml"), "type = ").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = store
            .contexts_of_type(ContextType::Server)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["server1", "server2"]);

        let missing = FsContextStore::new(temp_dir.path().join("missing"));
        assert!(missing.contexts_of_type(ContextType::Site).unwrap().is_empty());
    }
}
