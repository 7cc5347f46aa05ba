use anyhow::{Context, Result};
use std::path::PathBuf;

/// One of the five icons bundled with the tool, addressed by its `-t` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconKind {
    Error,
    Info,
    Question,
    Success,
    Warn,
}

impl IconKind {
    /// Tags are matched exactly; anything outside the table is fatal.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "error" => Ok(Self::Error),
            "info" => Ok(Self::Info),
            "question" => Ok(Self::Question),
            "success" => Ok(Self::Success),
            "warn" => Ok(Self::Warn),
            _ => anyhow::bail!(
                "unknown notification type '{tag}' (expected one of: error, info, question, success, warn)"
            ),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Error => "error.png",
            Self::Info => "info.png",
            Self::Question => "question.png",
            Self::Success => "success.png",
            Self::Warn => "warn.png",
        }
    }

    /// Absolute path of the bundled asset, resolved against the directory
    /// the executable was installed to.
    pub fn asset_path(self) -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Failed to locate executable")?;
        let dir = exe
            .parent()
            .context("Executable has no parent directory")?;
        Ok(dir.join("img").join(self.file_name()))
    }
}
