//! Dependency injection traits for testability.
//!
//! Trait abstractions for the ambient collaborators (file system,
//! process environment, terminal), so commands can be exercised against
//! mocks. The domain seams live next to their production impls:
//! [`crate::store::DeploymentStore`], [`crate::envstate::EnvState`] and
//! [`crate::verify::CloudVerifier`].

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

/// File system operations
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a file to string
    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Process environment lookup
pub trait EnvReader: Send + Sync {
    /// Get an environment variable, if set
    fn var(&self, key: &str) -> Option<String>;
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Create a spinner progress indicator
    fn create_spinner(&self) -> Box<dyn ProgressIndicator>;

    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);

    /// Check if running in interactive mode
    fn is_interactive(&self) -> bool;

    /// Prompt for text input
    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> Result<String>;
}

/// Progress indicator trait
pub trait ProgressIndicator: Send + Sync {
    /// Set the message
    fn set_message(&self, message: &str);

    /// Enable steady tick
    fn enable_steady_tick(&self, duration: Duration);

    /// Finish and clear the progress
    fn finish_and_clear(&self);
}

/// Message styling options
#[derive(Debug, Clone, Copy)]
pub enum MessageStyle {
    Bold,
    Cyan,
    Red,
    Yellow,
    Warning,
    Error,
    Success,
}

// Production implementations

/// Production file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
    }
}

/// Production environment lookup
pub struct RealEnvReader;

impl EnvReader for RealEnvReader {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
