//! Pascal VOC to YOLO format converter
//!
//! This library converts per-image Pascal VOC XML annotations into normalized
//! YOLO label files and splits the images into train and test partitions.

pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod labels;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, Delimiter, PipelineConfig, TRAIN_FRACTION};
pub use conversion::{build_table, normalize_box, FeatureTable};
pub use dataset::{run_pipeline, split_filenames};
pub use error::{ConvertError, Result};
pub use io::{load_annotations, setup_output_directories, OutputReset, RecreateDir};
pub use types::{AnnotationRecord, DerivedRecord, LabelRow, ProcessingStats, SplitData};
