use indicatif::ProgressBar;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fs::{copy, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::conversion::{build_table, format_label_row, FeatureTable};
use crate::error::{ConvertError, Result};
use crate::io::{create_dataset_yaml, load_annotations, setup_output_directories, OutputReset};
use crate::types::{LabelRow, Partition, ProcessingStats, SplitData};
use crate::utils::{create_progress_bar, label_file_name, seed_from_clock};

/// Label rows per image, sorted by filename; rows keep table order.
pub type GroupedRows = BTreeMap<String, Vec<LabelRow>>;

/// Number of images assigned to training out of `total`.
pub fn train_count(total: usize, train_fraction: f64) -> usize {
    ((total as f64 * train_fraction).round() as usize).min(total)
}

/// Split the filenames into training and testing sets
pub fn split_filenames(filenames: &[String], train_fraction: f64, seed: u64) -> SplitData {
    let mut shuffled = filenames.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n_train = train_count(shuffled.len(), train_fraction);
    let test = shuffled.split_off(n_train);

    SplitData {
        train: shuffled.into_iter().collect(),
        test: test.into_iter().collect(),
    }
}

/// Filter the table into its train and test halves; an image's rows never straddle both.
pub fn partition_table(table: &FeatureTable, split: &SplitData) -> (FeatureTable, FeatureTable) {
    let train = table.filter(|filename| split.train.contains(filename));
    let test = table.filter(|filename| split.test.contains(filename));
    (train, test)
}

pub fn group_by_filename(rows: Vec<(String, LabelRow)>) -> GroupedRows {
    let mut groups = GroupedRows::new();
    for (filename, row) in rows {
        groups.entry(filename).or_default().push(row);
    }
    groups
}

/// Fail before touching the output tree if any referenced image is absent
pub fn check_source_images<'a, I>(images_dir: &Path, filenames: I) -> Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    for filename in filenames {
        let source = images_dir.join(filename);
        if !source.is_file() {
            return Err(ConvertError::MissingImage(source));
        }
    }
    Ok(())
}

/// Copy one image and write its label file next to it
pub fn export_image(
    filename: &str,
    rows: &[LabelRow],
    images_dir: &Path,
    destination_dir: &Path,
    delimiter: &str,
) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let source = images_dir.join(filename);
    if !source.is_file() {
        return Err(ConvertError::MissingImage(source));
    }
    let destination = destination_dir.join(filename);
    let text_filename = destination_dir.join(label_file_name(filename));

    copy(&source, &destination).map_err(|e| ConvertError::io(&source, e))?;

    let write = || -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&text_filename)?);
        for row in rows {
            writeln!(writer, "{}", format_label_row(row, delimiter))?;
        }
        writer.flush()
    };
    write().map_err(|e| ConvertError::io(&text_filename, e))?;

    Ok((source, destination, text_filename))
}

/// The per-image stdout line: `source destination label_path`
pub fn progress_line(source: &Path, destination: &Path, text_filename: &Path) -> String {
    format!(
        "{} {} {}",
        source.display(),
        destination.display(),
        text_filename.display()
    )
}

/// Export every image of one partition, printing a progress line per image
pub fn export_split(
    groups: &GroupedRows,
    images_dir: &Path,
    destination_dir: &Path,
    delimiter: &str,
    pb: &ProgressBar,
) -> Result<()> {
    for (filename, rows) in groups {
        let (source, destination, text_filename) =
            export_image(filename, rows, images_dir, destination_dir, delimiter)?;
        let line = progress_line(&source, &destination, &text_filename);
        pb.suspend(|| println!("{}", line));
        pb.inc(1);
    }
    Ok(())
}

/// Main dataset processing pipeline
pub fn run_pipeline(config: &PipelineConfig, reset: &dyn OutputReset) -> Result<ProcessingStats> {
    let mut stats = ProcessingStats::default();

    let (file_count, records) = load_annotations(&config.annotations_dir)?;
    stats.annotation_files = file_count;
    stats.objects = records.len();
    info!(
        "Read {} annotation files with {} objects.",
        file_count,
        records.len()
    );

    let table = build_table(records)?;
    let filenames = table.filenames();

    let seed = config.seed.unwrap_or_else(seed_from_clock);
    info!("Splitting {} images with seed {}.", filenames.len(), seed);
    let split = split_filenames(&filenames, config.train_fraction, seed);

    let (train_table, test_table) = partition_table(&table, &split);
    let train_groups = group_by_filename(train_table.encode_labels()?);
    let test_groups = group_by_filename(test_table.encode_labels()?);

    check_source_images(
        &config.images_dir,
        train_groups.keys().chain(test_groups.keys()),
    )?;

    let output_dirs = setup_output_directories(&config.output_dir, reset)?;
    let delimiter = config.delimiter.as_str();

    for (partition, groups) in [
        (Partition::Train, &train_groups),
        (Partition::Test, &test_groups),
    ] {
        let pb = create_progress_bar(groups.len() as u64, partition.label());
        export_split(
            groups,
            &config.images_dir,
            output_dirs.for_partition(partition),
            delimiter,
            &pb,
        )?;
        pb.finish_with_message(format!("{} processing complete", partition.label()));
    }

    stats.train_images = train_groups.len();
    stats.test_images = test_groups.len();
    stats.train_rows = train_groups.values().map(Vec::len).sum();
    stats.test_rows = test_groups.values().map(Vec::len).sum();

    info!("Creating dataset.yaml file...");
    create_dataset_yaml(&output_dirs)?;
    info!("Conversion process completed successfully.");

    Ok(stats)
}
