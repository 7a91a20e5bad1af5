use std::collections::HashSet;

use crate::error::{ConvertError, Result};
use crate::labels;
use crate::types::{AnnotationRecord, DerivedRecord, LabelRow};

/// Rows in input order, each carrying its normalized box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<DerivedRecord>,
}

impl FeatureTable {
    pub fn rows(&self) -> &[DerivedRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct image filenames in order of first appearance.
    pub fn filenames(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter(|row| seen.insert(row.record.filename.as_str()))
            .map(|row| row.record.filename.clone())
            .collect()
    }

    /// Keep the rows whose filename satisfies `keep`, preserving order.
    pub fn filter<F>(&self, mut keep: F) -> FeatureTable
    where
        F: FnMut(&str) -> bool,
    {
        FeatureTable {
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.record.filename.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Attach label ids; any class outside the vocabulary aborts.
    pub fn encode_labels(&self) -> Result<Vec<(String, LabelRow)>> {
        self.rows
            .iter()
            .map(|row| {
                let id = labels::encode(&row.record.class_name)?;
                Ok((
                    row.record.filename.clone(),
                    LabelRow {
                        id,
                        center_x: row.center_x,
                        center_y: row.center_y,
                        w: row.w,
                        h: row.h,
                    },
                ))
            })
            .collect()
    }
}

/// Build the feature table, rejecting any box that does not fit its image.
pub fn build_table(records: Vec<AnnotationRecord>) -> Result<FeatureTable> {
    let rows = records
        .into_iter()
        .map(normalize_box)
        .collect::<Result<Vec<_>>>()?;
    Ok(FeatureTable { rows })
}

/// Calculate the YOLO center/size triple for a single record
pub fn normalize_box(record: AnnotationRecord) -> Result<DerivedRecord> {
    validate_geometry(&record)?;

    let width = record.width as f64;
    let height = record.height as f64;
    let center_x = (record.xmax + record.xmin) as f64 / 2.0 / width;
    let center_y = (record.ymax + record.ymin) as f64 / 2.0 / height;
    let w = (record.xmax - record.xmin) as f64 / width;
    let h = (record.ymax - record.ymin) as f64 / height;

    Ok(DerivedRecord {
        record,
        center_x,
        center_y,
        w,
        h,
    })
}

fn validate_geometry(record: &AnnotationRecord) -> Result<()> {
    let fail = |reason: String| -> Result<()> {
        Err(ConvertError::DegenerateGeometry {
            filename: record.filename.clone(),
            reason,
        })
    };

    if record.width == 0 || record.height == 0 {
        return fail(format!(
            "image size {}x{} must be positive",
            record.width, record.height
        ));
    }
    let (width, height) = (i64::from(record.width), i64::from(record.height));
    if !(0 <= record.xmin && record.xmin < record.xmax && record.xmax <= width) {
        return fail(format!(
            "x bounds {}..{} outside 0..{} for {:?}",
            record.xmin, record.xmax, width, record.class_name
        ));
    }
    if !(0 <= record.ymin && record.ymin < record.ymax && record.ymax <= height) {
        return fail(format!(
            "y bounds {}..{} outside 0..{} for {:?}",
            record.ymin, record.ymax, height, record.class_name
        ));
    }
    Ok(())
}

/// Render one label line; no trailing newline.
pub fn format_label_row(row: &LabelRow, delimiter: &str) -> String {
    [
        row.id.to_string(),
        format_float(row.center_x),
        format_float(row.center_y),
        format_float(row.w),
        format_float(row.h),
    ]
    .join(delimiter)
}

/// Shortest round-trip form, always with a decimal point (`1.0`, `0.15`).
///
/// Magnitudes below 1e-4 or from 1e16 up use a two-digit signed exponent
/// (`1e-05`, `2.5e-07`), the same text pandas writes for these values.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let exponent: i32 = exponent.parse().unwrap_or(0);
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            }
            None => text,
        };
    }
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}
