//! Image discovery for a single split.

use std::path::{Path, PathBuf};

use tracing::trace;
use walkdir::WalkDir;

use crate::error::VerifyError;

/// Raster image extensions recognized as dataset images (compared
/// case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// List the images directly inside `images_dir`, sorted by path.
///
/// A missing directory (or a path that is not a directory) yields an empty
/// list; whether that is worth a warning is the caller's call. Files with
/// other extensions are skipped silently, and subdirectories are not
/// descended into.
pub fn iter_images(images_dir: &Path) -> Result<Vec<PathBuf>, VerifyError> {
    if !images_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(images_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_dangling_link(&err) => {
                trace!(path = ?err.path(), "skipping dangling symlink");
                continue;
            }
            Err(source) => {
                return Err(VerifyError::Traverse {
                    path: images_dir.to_path_buf(),
                    source,
                })
            }
        };

        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            images.push(entry.into_path());
        }
    }

    images.sort();
    Ok(images)
}

/// A child entry whose link target does not exist. It is not a file, so it
/// is skipped like any other non-image entry.
fn is_dangling_link(err: &walkdir::Error) -> bool {
    err.depth() == 1
        && err
            .io_error()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}
