use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Fraction of images assigned to the training split.
pub const TRAIN_FRACTION: f64 = 0.8;

/// Command-line arguments for converting Pascal VOC XML to a YOLO dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the Pascal VOC XML annotation files
    #[arg(long = "annotations_dir", default_value = "/data/annotations/train")]
    pub annotations_dir: PathBuf,

    /// Directory containing the images referenced by the annotations
    #[arg(long = "images_dir", default_value = "/data/images")]
    pub images_dir: PathBuf,

    /// Output root; wiped and recreated on every run
    #[arg(long = "output_dir", default_value = "/data/generated")]
    pub output_dir: PathBuf,

    /// Seed for the train/test split (defaults to one derived from the clock)
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Field delimiter used in the label files
    #[arg(long = "delimiter", value_enum, default_value = "comma")]
    pub delimiter: Delimiter,
}

impl Args {
    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            annotations_dir: self.annotations_dir.clone(),
            images_dir: self.images_dir.clone(),
            output_dir: self.output_dir.clone(),
            train_fraction: TRAIN_FRACTION,
            seed: self.seed,
            delimiter: self.delimiter,
        }
    }
}

// Separator placed between the fields of a label row
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Delimiter {
    Comma,
    Space,
}

impl Delimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Space => " ",
        }
    }
}

/// Everything the pipeline needs, passed in explicitly instead of read from globals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub annotations_dir: PathBuf,
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    pub train_fraction: f64,
    pub seed: Option<u64>,
    pub delimiter: Delimiter,
}
