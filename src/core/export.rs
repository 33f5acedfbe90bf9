use crate::core::post::GeneratedPost;
use crate::error::PostGenError;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

pub const TEXT_MIME: &str = "text/plain";

/// A ready-to-save export of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Where an export landed, and whether it replaced an earlier file of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedExport {
    pub path: PathBuf,
    pub replaced: bool,
}

impl Download {
    pub fn save_into(&self, dir: &Path) -> Result<SavedExport, PostGenError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        let replaced = path.try_exists()?;
        fs::write(&path, &self.bytes)?;
        if replaced {
            log::warn!("💾 Overwrote earlier export '{}'", path.display());
        } else {
            log::info!("💾 Post saved to '{}'", path.display());
        }
        Ok(SavedExport { path, replaced })
    }
}

pub fn download_filename(at: &DateTime<Local>) -> String {
    format!("linkedin_post_{}.txt", at.format("%Y%m%d_%H%M"))
}

/// Serialises the post text as-is. `at` is the moment of export, not of generation.
pub fn download(post: &GeneratedPost, at: &DateTime<Local>) -> Download {
    Download {
        filename: download_filename(at),
        mime: TEXT_MIME,
        bytes: post.text.as_bytes().to_vec(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTarget {
    GrammarCheck,
    VisualDesign,
}

impl ExternalTarget {
    pub fn url(self) -> &'static str {
        match self {
            ExternalTarget::GrammarCheck => "https://app.grammarly.com/",
            ExternalTarget::VisualDesign => "https://www.canva.com/create/social-media/",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExternalTarget::GrammarCheck => "Open in Grammarly",
            ExternalTarget::VisualDesign => "Design in Canva",
        }
    }
}

/// Frames the post for the terminal.
pub fn render(post: &GeneratedPost) -> String {
    let rule = "─".repeat(60);
    format!(
        "{rule}\nYour LinkedIn Post ({})\n{rule}\n{}\n{rule}",
        post.generated_at.format("%Y-%m-%d %H:%M"),
        post.text
    )
}
