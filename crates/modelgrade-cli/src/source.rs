//! Transcripts stored on disk.

use modelgrade_domain::{StoryId, TranscriptSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads `<root>/<story>/R<round>.txt`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the transcripts are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File expected to hold the transcript for a story and round.
    pub fn path_for(&self, story: &StoryId, round: u32) -> PathBuf {
        self.root.join(story.as_str()).join(format!("R{}.txt", round))
    }
}

impl TranscriptSource for DirectorySource {
    type Error = io::Error;

    fn transcript(&self, story: &StoryId, round: u32) -> Result<String, Self::Error> {
        let path = self.path_for(story, round);
        fs::read_to_string(&path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    }
}
