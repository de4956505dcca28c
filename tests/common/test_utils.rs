use std::{fs, path::PathBuf};

/// Temporary filter document that is removed when dropped
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Create a path in the system temp dir based on the test name
    pub fn new(test_name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "test_doc_{}_{}.json",
            test_name,
            std::process::id()
        ));
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
