use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info};

use crate::error::GameError;

/// Fewest distinct images a 4x4 board can be dealt from.
pub const MIN_IMAGES: usize = 8;
const IMAGE_EXTENSION: &str = "png";

/// Identity of a tile image: the file name inside the asset directory.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(Rc<str>);

impl ImageId {
    pub fn new(name: &str) -> Self {
        ImageId(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct AssetCatalog {
    dir: PathBuf,
    images: Vec<ImageId>,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(IMAGE_EXTENSION))
}

impl AssetCatalog {
    pub fn load(dir: &Path) -> Result<Self, GameError> {
        if !dir.is_dir() {
            return Err(GameError::AssetDirectoryMissing {
                path: dir.to_path_buf(),
                required: MIN_IMAGES,
            });
        }

        let unreadable = |source| GameError::AssetDirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            if !path.is_file() || !is_image(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
        // Directory order is platform dependent; seeded runs need a stable one.
        names.sort();
        debug!(dir = %dir.display(), count = names.len(), "scanned asset directory");

        if names.len() < MIN_IMAGES {
            return Err(GameError::InsufficientAssets {
                path: dir.to_path_buf(),
                found: names.len(),
                required: MIN_IMAGES,
            });
        }

        info!(dir = %dir.display(), images = names.len(), "asset catalog loaded");
        Ok(AssetCatalog {
            dir: dir.to_path_buf(),
            images: names.iter().map(|name| ImageId::new(name)).collect(),
        })
    }

    pub fn images(&self) -> &[ImageId] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn path_of(&self, id: &ImageId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    #[cfg(test)]
    pub(crate) fn from_names(names: &[&str]) -> Self {
        AssetCatalog {
            dir: PathBuf::from("assets"),
            images: names.iter().map(|name| ImageId::new(name)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.child(name), b"").unwrap();
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.child("nowhere");
        match AssetCatalog::load(&missing) {
            Err(GameError::AssetDirectoryMissing { path, required }) => {
                assert_eq!(path, missing);
                assert_eq!(required, MIN_IMAGES);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn too_few_images_fail_before_anything_else() {
        let dir = TempDir::new().unwrap();
        for i in 0..7 {
            touch(&dir, &format!("animal{i}.png"));
        }
        touch(&dir, "notes.txt");
        match AssetCatalog::load(dir.path()) {
            Err(GameError::InsufficientAssets { found, required, .. }) => {
                assert_eq!(found, 7);
                assert_eq!(required, 8);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn extension_filter_ignores_case_and_other_files() {
        let dir = TempDir::new().unwrap();
        for name in [
            "a.png", "b.PNG", "c.Png", "d.png", "e.png", "f.png", "g.png", "h.pNg", "i.jpg",
            "readme",
        ] {
            touch(&dir, name);
        }
        fs::create_dir(dir.child("folder.png")).unwrap();

        let catalog = AssetCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 8);
        let names: Vec<&str> = catalog.images().iter().map(ImageId::as_str).collect();
        assert!(!names.contains(&"i.jpg"));
        assert!(!names.contains(&"folder.png"));
        assert_eq!(catalog.path_of(&catalog.images()[0]), dir.child("a.png"));
    }

    #[test]
    fn images_are_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["h", "c", "a", "g", "b", "f", "e", "d"] {
            touch(&dir, &format!("{name}.png"));
        }
        let catalog = AssetCatalog::load(dir.path()).unwrap();
        let names: Vec<&str> = catalog.images().iter().map(ImageId::as_str).collect();
        assert_eq!(
            names,
            ["a.png", "b.png", "c.png", "d.png", "e.png", "f.png", "g.png", "h.png"]
        );
    }
}
