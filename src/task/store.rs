//! On-disk task storage, one pretty-printed JSON document per task

use crate::error::{Error, Result};
use crate::task::types::Task;
use std::path::{Path, PathBuf};

pub struct TaskStore {
    base_dir: PathBuf,
}

impl TaskStore {
    /// Open a store rooted at `base_dir`, creating the directory if needed
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", Task::storage_key(name)))
    }

    /// Persist a task under its normalized name, replacing any previous version
    pub fn save(&self, task: &Task) -> Result<PathBuf> {
        let path = self.path_for(&task.name);
        let data = serde_json::to_vec_pretty(task)?;
        std::fs::write(&path, data)?;
        tracing::info!(
            "Task '{}' saved to {} ({} actions)",
            task.name,
            path.display(),
            task.actions.len()
        );
        Ok(path)
    }

    /// Storage keys of all saved tasks, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Task> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(Error::NotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::MouseButton;
    use crate::task::types::Action;
    use pretty_assertions::assert_eq;

    fn sample() -> Task {
        Task::new(
            "Open Notes",
            "open the notes app",
            vec![
                Action::mouse_move(0.1, 10, 20),
                Action::click(0.2, MouseButton::Left, 10, 20),
                Action::typed(1.4, "hello"),
                Action::key(1.6, "enter"),
            ],
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();

        let path = store.save(&sample()).unwrap();
        assert_eq!(path, dir.path().join("open_notes.json"));

        // Lookup by display name and by key resolve the same file
        assert_eq!(store.load("Open Notes").unwrap(), sample());
        assert_eq!(store.load("open_notes").unwrap(), sample());
    }

    #[test]
    fn test_resave_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();
        store.save(&sample()).unwrap();

        let replacement = Task::new("open notes", "again", vec![Action::key(0.0, "tab")]);
        store.save(&replacement).unwrap();

        assert_eq!(store.list().unwrap(), vec!["open_notes".to_string()]);
        assert_eq!(store.load("Open Notes").unwrap(), replacement);
    }

    #[test]
    fn test_list_is_sorted_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();
        store.save(&Task::new("zeta", "", vec![])).unwrap();
        store.save(&Task::new("Alpha Task", "", vec![])).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list().unwrap(), vec!["alpha_task", "zeta"]);
    }

    #[test]
    fn test_missing_task_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();
        assert!(matches!(store.load("nope"), Err(Error::NotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_creates_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("tasks");
        let store = TaskStore::new(&nested).unwrap();
        assert!(store.base_dir().is_dir());
    }
}
