#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Create the four split directories and `data.yaml` under `root`.
pub fn create_layout(root: &Path) {
    for dir in ["images/train", "images/val", "labels/train", "labels/val"] {
        fs::create_dir_all(root.join(dir)).expect("create dataset dir");
    }
    fs::write(root.join("data.yaml"), "names:\n  - car\n  - person\n  - sign\n")
        .expect("write data.yaml");
}

/// Write an image placeholder. Image content is never decoded.
pub fn write_image(root: &Path, split: &str, name: &str) {
    fs::write(root.join("images").join(split).join(name), b"\x89PNG placeholder")
        .expect("write image");
}

pub fn write_label(root: &Path, split: &str, stem: &str, content: &str) {
    fs::write(
        root.join("labels").join(split).join(format!("{stem}.txt")),
        content,
    )
    .expect("write label file");
}

/// Two images per split, every label well-formed: 5 objects in total.
pub fn create_valid_dataset(root: &Path) {
    create_layout(root);

    write_image(root, "train", "img_a.jpg");
    write_label(root, "train", "img_a", "0 0.5 0.5 0.4 0.4\n1 0.2 0.3 0.1 0.2\n");
    write_image(root, "train", "img_b.png");
    write_label(root, "train", "img_b", "2 0.5 0.5 1.0 1.0\n");

    write_image(root, "val", "img_c.JPEG");
    write_label(root, "val", "img_c", "\n0 0.1 0.1 0.05 0.05\n\n1 0.9 0.9 0.1 0.1\n");
    write_image(root, "val", "img_d.webp");
    write_label(root, "val", "img_d", "");
}
