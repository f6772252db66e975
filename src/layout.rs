//! Dataset root layout.
//!
//! A verifiable dataset root looks like:
//!
//! ```text
//! <root>/
//!   data.yaml
//!   images/{train,val}/*.{jpg,jpeg,png,bmp,webp}
//!   labels/{train,val}/<stem>.txt
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// File name of the dataset descriptor. Only its presence is checked.
pub const DESCRIPTOR_FILE: &str = "data.yaml";

const IMAGES_DIR: &str = "images";
const LABELS_DIR: &str = "labels";
const LABEL_EXTENSION: &str = "txt";

/// A named dataset partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
}

impl Split {
    /// All splits, in processing order.
    pub const ALL: [Split; 2] = [Split::Train, Split::Val];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path arithmetic for a dataset root. Nothing here touches the disk except
/// [`DatasetLayout::missing_paths`].
#[derive(Clone, Debug)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn images_dir(&self, split: Split) -> PathBuf {
        self.root.join(IMAGES_DIR).join(split.as_str())
    }

    pub fn labels_dir(&self, split: Split) -> PathBuf {
        self.root.join(LABELS_DIR).join(split.as_str())
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_FILE)
    }

    /// Every path that must exist, in reporting order: the images
    /// directories, then the labels directories, then the descriptor.
    pub fn required_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Split::ALL.iter().map(|s| self.images_dir(*s)).collect();
        paths.extend(Split::ALL.iter().map(|s| self.labels_dir(*s)));
        paths.push(self.descriptor_path());
        paths
    }

    /// Required paths that do not exist, in [`required_paths`](Self::required_paths) order.
    pub fn missing_paths(&self) -> Vec<PathBuf> {
        self.required_paths()
            .into_iter()
            .filter(|path| !path.exists())
            .collect()
    }

    /// The label file expected for `image`: same stem, `.txt`, in the split's
    /// labels directory.
    ///
    /// Only the final extension of the image is replaced, so `a.b.jpg` maps to
    /// `a.b.txt`.
    pub fn label_path_for(&self, split: Split, image: &Path) -> PathBuf {
        let mut name = image.file_stem().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(LABEL_EXTENSION);
        self.labels_dir(split).join(name)
    }
}
