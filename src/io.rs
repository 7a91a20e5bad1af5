use glob::{glob_with, MatchOptions};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::labels::{self, VOCABULARY};
use crate::types::{AnnotationRecord, Partition, VocAnnotation};
use crate::utils::is_bare_file_name;

/// Clears the output root before a run writes into it.
pub trait OutputReset {
    fn reset(&self, root: &Path) -> std::io::Result<()>;
}

/// Remove the directory recursively if present, then create it empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecreateDir;

impl OutputReset for RecreateDir {
    fn reset(&self, root: &Path) -> std::io::Result<()> {
        if root.exists() {
            log::warn!(
                "Directory {:?} already exists. Deleting and recreating it.",
                root
            );
            fs::remove_dir_all(root)?;
        }
        fs::create_dir_all(root)
    }
}

// Paths of the per-partition output directories
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub train_dir: PathBuf,
    pub test_dir: PathBuf,
}

impl OutputDirs {
    pub fn for_partition(&self, partition: Partition) -> &Path {
        match partition {
            Partition::Train => &self.train_dir,
            Partition::Test => &self.test_dir,
        }
    }
}

/// Reset the output root and create its `train/` and `test/` subdirectories
pub fn setup_output_directories(root: &Path, reset: &dyn OutputReset) -> Result<OutputDirs> {
    reset.reset(root).map_err(|e| ConvertError::io(root, e))?;

    let train_dir = root.join(Partition::Train.dir_name());
    let test_dir = root.join(Partition::Test.dir_name());
    for dir in [&train_dir, &test_dir] {
        fs::create_dir_all(dir).map_err(|e| ConvertError::io(dir, e))?;
    }

    Ok(OutputDirs {
        root: root.to_path_buf(),
        train_dir,
        test_dir,
    })
}

/// Read and parse a single annotation file into its typed document
pub fn parse_annotation_file(path: &Path) -> Result<VocAnnotation> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    // Decoded from raw bytes so the encoding declared in the XML prolog is honoured
    let mut deserializer = quick_xml::de::Deserializer::from_reader(BufReader::new(file));
    let annotation = VocAnnotation::deserialize(&mut deserializer)
        .map_err(|e| ConvertError::malformed(path, e))?;

    if annotation.filename.trim().is_empty() {
        return Err(ConvertError::malformed(path, "filename is empty"));
    }
    if !is_bare_file_name(&annotation.filename) {
        return Err(ConvertError::malformed(
            path,
            format!(
                "filename {:?} must not contain directory components",
                annotation.filename
            ),
        ));
    }
    Ok(annotation)
}

/// Flatten a document into one record per object
pub fn flatten_annotation(annotation: &VocAnnotation) -> Vec<AnnotationRecord> {
    annotation
        .objects
        .iter()
        .map(|object| AnnotationRecord {
            filename: annotation.filename.clone(),
            width: annotation.size.width,
            height: annotation.size.height,
            class_name: object.name.clone(),
            xmin: object.bndbox.xmin,
            xmax: object.bndbox.xmax,
            ymin: object.bndbox.ymin,
            ymax: object.bndbox.ymax,
        })
        .collect()
}

/// List the `*.xml` files directly inside `dirname`, in sorted order
pub fn find_annotation_files(dirname: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.xml", glob::Pattern::escape(&dirname.to_string_lossy()));
    let mut paths = Vec::new();
    // Hidden files such as `._name.xml` sidecars are not annotations
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    for entry in glob_with(&pattern, options)? {
        let path = entry.map_err(|e| {
            let error = std::io::Error::new(e.error().kind(), e.error().to_string());
            ConvertError::io(e.path(), error)
        })?;
        paths.push(path);
    }
    paths.sort();
    Ok(paths)
}

/// Load every annotation file in `dirname`, returning the file count and the flat records.
///
/// Files are parsed in parallel, but records keep path order and the first
/// failing file (in that order) is the one reported.
pub fn load_annotations(dirname: &Path) -> Result<(usize, Vec<AnnotationRecord>)> {
    let paths = find_annotation_files(dirname)?;

    let parsed: Vec<VocAnnotation> = paths
        .par_iter()
        .map(|path| parse_annotation_file(path))
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<_>>()?;

    let records = parsed.iter().flat_map(flatten_annotation).collect();
    Ok((paths.len(), records))
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(output_dirs: &OutputDirs) -> Result<()> {
    let dataset_yaml_path = output_dirs.root.join("dataset.yaml");
    let absolute_path =
        fs::canonicalize(&output_dirs.root).map_err(|e| ConvertError::io(&output_dirs.root, e))?;

    let mut yaml_content = format!(
        "path: {}\ntrain: {}\ntest: {}\nnc: {}\n\nnames:\n",
        absolute_path.to_string_lossy(),
        Partition::Train.dir_name(),
        Partition::Test.dir_name(),
        VOCABULARY.len()
    );
    let names = (0..VOCABULARY.len() as u32)
        .filter_map(|id| labels::decode(id).map(|label| (id, label)));
    for (id, label) in names {
        yaml_content.push_str(&format!("    {}: {}\n", id, label));
    }

    let write = || -> std::io::Result<()> {
        let mut dataset_yaml = BufWriter::new(File::create(&dataset_yaml_path)?);
        dataset_yaml.write_all(yaml_content.as_bytes())?;
        dataset_yaml.flush()
    };
    write().map_err(|e| ConvertError::io(&dataset_yaml_path, e))
}
