//! toolchain::strip
//!
//! The symbol-stripping adapter: `strip <artifact>`, modifying the file in
//! place.

use std::path::Path;
use std::process::Command;

use super::process::run_captured;
use super::{Stripper, ToolError};

/// Strip adapter.
#[derive(Debug, Clone)]
pub struct Strip {
    program: String,
}

impl Strip {
    /// Create an adapter invoking `program` (usually `strip`).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Stripper for Strip {
    fn strip(&self, artifact: &Path) -> Result<(), ToolError> {
        run_captured(Command::new(&self.program).arg(artifact), &self.program)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_strip_tool_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let artifact = dir.path().join("bin");
        std::fs::write(&artifact, b"not an object file").unwrap();

        let strip = Strip::new("revsize-no-such-strip");
        let err = strip.strip(&artifact).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
