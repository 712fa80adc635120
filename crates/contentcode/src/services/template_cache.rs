//! Template Cache - Read-through cache of prompt template files

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::errors::DomainError;

/// Template bodies keyed by file path
///
/// Each distinct path is read at most once. The lock is held across the
/// miss-read-insert sequence so concurrent callers never read a file twice.
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: Mutex<HashMap<PathBuf, Arc<str>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the template at `path`, reading it on first use
    pub fn get(&self, path: &Path) -> Result<Arc<str>, DomainError> {
        let mut templates = self
            .templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(template) = templates.get(path) {
            return Ok(Arc::clone(template));
        }

        let body = std::fs::read_to_string(path).map_err(|source| DomainError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded prompt template {}", path.display());

        let template: Arc<str> = Arc::from(body);
        templates.insert(path.to_path_buf(), Arc::clone(&template));
        Ok(template)
    }

    pub fn len(&self) -> usize {
        self.templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_template_read_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "Score this: {{essay}}").unwrap();

        let cache = TemplateCache::new();
        assert_eq!(&*cache.get(&path).unwrap(), "Score this: {{essay}}");

        // A second lookup is served from memory even after the file changes
        std::fs::remove_file(&path).unwrap();
        assert_eq!(&*cache.get(&path).unwrap(), "Score this: {{essay}}");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let cache = TemplateCache::new();
        let err = cache.get(&path).unwrap_err();
        assert!(matches!(err, DomainError::TemplateRead { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_lookups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        std::fs::write(&path, "{{prompt}}").unwrap();

        let cache = Arc::new(TemplateCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                std::thread::spawn(move || cache.get(&path).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(&*handle.join().unwrap(), "{{prompt}}");
        }
        assert_eq!(cache.len(), 1);
    }
}
