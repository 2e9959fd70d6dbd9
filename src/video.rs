use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "m4v", "mkv", "avi", "webm", "mpeg", "mpg", "3gp", "wmv", "ogv",
];

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("no such file: {0}")]
    NotFound(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("unsupported video type: {0}")]
    UnsupportedType(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle to an attached local video. Deliberately not `Clone`: the one
/// owner must give it back through [`VideoLibrary::revoke`].
#[derive(Debug, PartialEq, Eq)]
pub struct VideoRef {
    id: u64,
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl VideoRef {
    pub fn size_label(&self) -> String {
        const MB: f64 = 1024.0 * 1024.0;
        if self.size_bytes as f64 >= MB {
            format!("{:.1} MB", self.size_bytes as f64 / MB)
        } else {
            format!("{} KB", self.size_bytes.div_ceil(1024))
        }
    }
}

/// Issues video handles and tracks which are still live.
#[derive(Debug, Default)]
pub struct VideoLibrary {
    next_id: u64,
    live: HashSet<u64>,
}

impl VideoLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, path: &Path) -> Result<VideoRef, VideoError> {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(VideoError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(VideoError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        if !meta.is_file() {
            return Err(VideoError::NotAFile(path.to_path_buf()));
        }
        if !is_video_path(path) {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(none)".to_string());
            return Err(VideoError::UnsupportedType(ext));
        }

        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(id);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(VideoRef {
            id,
            name,
            path: path.to_path_buf(),
            size_bytes: meta.len(),
        })
    }

    /// Release a handle. Returns false if it was already released.
    pub fn revoke(&mut self, video: VideoRef) -> bool {
        self.live.remove(&video.id)
    }

    pub fn live_handles(&self) -> usize {
        self.live.len()
    }
}

pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
