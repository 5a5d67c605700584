//! Simple test infrastructure for basic testing

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("AdaptiveQuiz=debug"))
            .with_test_writer()
            .try_init();
    });
}

/// Temporary directory for tests that write configuration or log files
pub struct SimpleTestContext {
    pub temp_dir: tempfile::TempDir,
}

impl SimpleTestContext {
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        init_test_env();
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn temp_path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Write `contents` to `name` inside the temp directory and return its path
    pub fn write_file(&self, name: &str, contents: &str) -> std::io::Result<std::path::PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
