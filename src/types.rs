use serde::Deserialize;
use std::collections::BTreeSet;

// A Pascal VOC annotation document; elements not listed here are ignored
#[derive(Debug, Deserialize, Clone)]
pub struct VocAnnotation {
    pub filename: String,
    pub size: VocSize,
    #[serde(rename = "object", default)]
    pub objects: Vec<VocObject>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct VocSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VocObject {
    pub name: String,
    pub bndbox: VocBndBox,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct VocBndBox {
    pub xmin: i64,
    pub xmax: i64,
    pub ymin: i64,
    pub ymax: i64,
}

/// One labelled object, with its image's metadata repeated on every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub class_name: String,
    pub xmin: i64,
    pub xmax: i64,
    pub ymin: i64,
    pub ymax: i64,
}

/// An annotation record plus its box normalized to the image size.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub record: AnnotationRecord,
    pub center_x: f64,
    pub center_y: f64,
    pub w: f64,
    pub h: f64,
}

/// A single line of a label file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRow {
    pub id: u32,
    pub center_x: f64,
    pub center_y: f64,
    pub w: f64,
    pub h: f64,
}

// Disjoint sets of image filenames for each partition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitData {
    pub train: BTreeSet<String>,
    pub test: BTreeSet<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Partition {
    Train,
    Test,
}

impl Partition {
    pub fn dir_name(self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Test => "test",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Partition::Train => "Train",
            Partition::Test => "Test",
        }
    }
}

// Counters reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub annotation_files: usize,
    pub objects: usize,
    pub train_images: usize,
    pub test_images: usize,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl ProcessingStats {
    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Annotation files read: {}", self.annotation_files);
        log::info!("Objects converted: {}", self.objects);
        log::info!(
            "Train split: {} images, {} label rows",
            self.train_images,
            self.train_rows
        );
        log::info!(
            "Test split: {} images, {} label rows",
            self.test_images,
            self.test_rows
        );
        if self.test_images == 0 {
            log::warn!("Test split is empty");
        }
    }
}
