use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error(
        "the asset directory '{}' was not found; create it and add at least {required} PNG images",
        path.display()
    )]
    AssetDirectoryMissing { path: PathBuf, required: usize },
    #[error(
        "the asset directory '{}' holds {found} PNG images, at least {required} are needed",
        path.display()
    )]
    InsufficientAssets {
        path: PathBuf,
        found: usize,
        required: usize,
    },
    #[error("failed to read the asset directory '{}': {source}", path.display())]
    AssetDirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no identities left to place on tile {index}")]
    NoAvailableIdentities { index: usize },
    #[error("failed to load image '{}': {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: glib::Error,
    },
    #[error("rendering failed: {0}")]
    Render(#[from] cairo::Error),
}
