use log::debug;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// External SVG to EMF conversion.
pub trait VectorConverter: Send + Sync {
    /// Any failure while probing counts as "not installed".
    fn is_available(&self) -> bool;

    fn convert(&self, svg_path: &Path, emf_path: &Path) -> io::Result<()>;
}

/// Shells out to an Inkscape compatible command line.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: String,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl VectorConverter for CommandConverter {
    fn is_available(&self) -> bool {
        match Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => status.success(),
            Err(e) => {
                debug!("{} is not runnable: {}", self.program, e);
                false
            }
        }
    }

    fn convert(&self, svg_path: &Path, emf_path: &Path) -> io::Result<()> {
        let status = Command::new(&self.program)
            .arg(svg_path)
            .arg("--export-type=emf")
            .arg(format!("--export-filename={}", emf_path.display()))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if !status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }
}
