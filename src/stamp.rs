use std::path::{Path, PathBuf};

use tiny_skia::Pixmap;

use crate::error::{CanvasError, CanvasResult};
use crate::surface::Surface;

/// Default directory searched for stamp images
pub const STAMP_DIR: &str = "./stamps";

/// Stamp images cycled by the "next stamp" action
#[derive(Debug, Clone, Default)]
pub struct StampLibrary {
    stamps: Vec<(PathBuf, Pixmap)>,
    current: usize,
}

impl StampLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every image in `dir`, in file name order
    ///
    /// Files that are not decodable images are skipped with a warning.
    pub fn load_dir(dir: impl AsRef<Path>) -> CanvasResult<Self> {
        let dir = dir.as_ref();
        let read_err = |source| CanvasError::StampDirectory {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = std::fs::read_dir(dir)
            .map_err(read_err)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect::<Vec<_>>();
        paths.sort();

        let mut library = Self::new();
        for path in paths {
            match image::open(&path) {
                Ok(decoded) => {
                    let stamp = Surface::from_rgba_image(&decoded.to_rgba8())?;
                    library.push(path, stamp.pixmap().clone());
                }
                Err(e) => log::warn!("Skipping stamp {}: {e}", path.display()),
            }
        }
        log::info!("Loaded {} stamps from {}", library.len(), dir.display());
        Ok(library)
    }

    pub fn push(&mut self, path: PathBuf, stamp: Pixmap) {
        self.stamps.push((path, stamp));
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn current(&self) -> Option<&Pixmap> {
        self.stamps.get(self.current).map(|(_, stamp)| stamp)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.stamps.get(self.current).map(|(path, _)| path.as_path())
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.stamps.is_empty()).then_some(self.current)
    }

    /// Advance to the next stamp, wrapping back to the first
    pub fn next(&mut self) -> Option<&Pixmap> {
        if self.stamps.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.stamps.len();
        self.current()
    }
}
