//! Figure state: titles, axes, the working dataset and the per-series
//! marker, label and color assignments that the plot functions read.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use crate::config::{PlotConfig, PublicationConfig};
use crate::plotting::axis::{Axis, DEFAULT_PADDING_VALUE};
use crate::plotting::data::{Dataset, Value};
use crate::plotting::error::{PlotError, PlotResult};
use crate::plotting::label::{format_template, Label, DEFAULT_LABEL_SIZE};
use crate::plotting::scale;
use crate::plotting::style::{Color, Colormap, Marker};

pub use crate::plotting::backend::FileType;

/// Markers handed out to isolation values, in order.
pub const DEFAULT_MARKERSET: [Marker; 8] = [
    Marker::Diamond,
    Marker::Triangle,
    Marker::TriangleDown,
    Marker::TriangleLeft,
    Marker::Circle,
    Marker::Square,
    Marker::Pentagon,
    Marker::Star,
];
pub const DEFAULT_DPI: u32 = 200;
pub const MINIMUM_DPI: u32 = 100;
pub const DEFAULT_SAVE_DIR: &str = "./";
pub const DEFAULT_FILE_NAME: &str = "figure";
/// Major tick count on a log axis too narrow for two powers of the base.
const LOG_FALLBACK_TICKS: usize = 6;
/// Isolation column created for rows appended under a constant label.
pub const LABEL_COLUMN: &str = "label";

/// Which columns of a source dataset to load, and how to isolate the rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSelection {
    pub x: String,
    pub y: String,
    pub color: Option<String>,
    pub isolate: Option<String>,
    /// Constant isolation value given to every loaded row
    pub label: Option<String>,
}

impl ColumnSelection {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        ColumnSelection {
            x: x.into(),
            y: y.into(),
            ..Default::default()
        }
    }

    pub fn color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }

    pub fn isolate(mut self, column: impl Into<String>) -> Self {
        self.isolate = Some(column.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn isolation_column(&self) -> Option<String> {
        self.isolate
            .clone()
            .or_else(|| self.label.as_ref().map(|_| LABEL_COLUMN.to_string()))
    }

    /// Column names used for a figure loaded with this selection.
    fn names(&self) -> Columns {
        Columns {
            x: self.x.clone(),
            y: self.y.clone(),
            color: self.color.clone(),
            isolate: self.isolation_column(),
        }
    }

    /// Copy the selected columns of `source` under the figure's `names`.
    fn extract(&self, source: &Dataset, names: &Columns) -> PlotResult<Dataset> {
        let fetch = |name: &str| {
            source
                .column(name)
                .ok_or_else(|| PlotError::MissingColumn(name.to_string()))
        };
        let x = fetch(self.x.as_str())?;
        let y = fetch(self.y.as_str())?;
        let color = self.color.as_deref().map(fetch).transpose()?;
        let isolate = match (&self.label, &self.isolate) {
            (Some(label), _) => Some(vec![Value::Text(label.clone()); source.len()]),
            (None, Some(column)) => Some(fetch(column.as_str())?.to_vec()),
            (None, None) => None,
        };

        let mut out = Dataset::new()
            .with_column(names.x.clone(), x)?
            .with_column(names.y.clone(), y)?;
        match (color, &names.color) {
            (Some(values), Some(name)) => out.push_column(name.clone(), values)?,
            (None, None) => {}
            _ => {
                return Err(PlotError::InvalidData(
                    "color column does not match the figure's data".to_string(),
                ))
            }
        }
        match (isolate, &names.isolate) {
            (Some(values), Some(name)) => out.push_column(name.clone(), values)?,
            (None, None) => {}
            _ => {
                return Err(PlotError::InvalidData(
                    "isolation column does not match the figure's data".to_string(),
                ))
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Columns {
    x: String,
    y: String,
    color: Option<String>,
    isolate: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisId {
    X,
    Y,
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisId::X => write!(f, "x"),
            AxisId::Y => write!(f, "y"),
        }
    }
}

/// Everything a plot function needs to draw one chart.
#[derive(Debug, Clone)]
pub struct Figure {
    title: Label,
    subtitle: Label,
    x_axis: Axis,
    y_axis: Axis,

    data: Option<Dataset>,
    columns: Option<Columns>,
    markers: IndexMap<Value, Marker>,
    labels: IndexMap<Value, String>,
    colors: IndexMap<Value, Color>,
    label_format: Option<String>,

    default_markers: Vec<Marker>,
    colormap: Colormap,
    label_size: u32,

    save_dir: PathBuf,
    file_name: String,
    file_type: FileType,
    dpi: u32,
    size_inches: Option<(f64, f64)>,
    publication: PublicationConfig,
    font_path: Option<PathBuf>,
}

impl Default for Figure {
    fn default() -> Self {
        Figure::new()
    }
}

impl Figure {
    pub fn new() -> Self {
        Figure {
            title: Label::default(),
            subtitle: Label::default(),
            x_axis: Axis::new(),
            y_axis: Axis::new(),
            data: None,
            columns: None,
            markers: IndexMap::new(),
            labels: IndexMap::new(),
            colors: IndexMap::new(),
            label_format: None,
            default_markers: DEFAULT_MARKERSET.to_vec(),
            colormap: Colormap::default(),
            label_size: DEFAULT_LABEL_SIZE,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
            file_type: FileType::default(),
            dpi: DEFAULT_DPI,
            size_inches: None,
            publication: PublicationConfig::default(),
            font_path: None,
        }
    }

    /// Create a figure whose defaults come from a loaded configuration.
    pub fn with_config(config: &PlotConfig) -> Self {
        let mut fig = Figure::new();

        let markers: Vec<Marker> = config
            .markers
            .iter()
            .filter_map(|m| match m.parse::<Marker>() {
                Ok(Marker::None) => None,
                Ok(marker) => Some(marker),
                Err(e) => {
                    warn!("{}, skipping", e);
                    None
                }
            })
            .collect();
        if !markers.is_empty() {
            fig.default_markers = markers;
        }
        fig.colormap = config.colormap.parse().unwrap_or_else(|e| {
            warn!("{}, using {}", e, Colormap::default());
            Colormap::default()
        });
        fig.label_size = config.label_size;
        fig.set_saveas(&config.save_dir, &config.file_name, &config.file_type);
        fig.set_dpi(Some(config.dpi));
        fig.publication = config.publication.clone();
        fig.font_path = config.font_path.clone();
        fig
    }

    // Data

    /// Drop the dataset and every per-isolation-value assignment.
    pub fn reset_data(&mut self) {
        self.data = None;
        self.columns = None;
        self.markers.clear();
        self.labels.clear();
        self.colors.clear();
    }

    /// Replace the figure's data with the selected columns of `source`.
    /// On error the figure is left as it was.
    pub fn load_data(&mut self, source: &Dataset, selection: &ColumnSelection) -> PlotResult<()> {
        let names = selection.names();
        let data = selection.extract(source, &names)?;
        self.reset_data();
        debug!("loaded {} rows into figure", data.len());
        self.data = Some(data);
        self.columns = Some(names);
        self.rebuild_assignments();
        Ok(())
    }

    /// Add the selected columns of `source` as new rows. The first append
    /// on an empty figure behaves like [`Figure::load_data`].
    pub fn append_data(&mut self, source: &Dataset, selection: &ColumnSelection) -> PlotResult<()> {
        let Some(names) = self.columns.as_ref() else {
            return self.load_data(source, selection);
        };
        let rows = selection.extract(source, names)?;
        debug!("appending {} rows to figure", rows.len());
        match self.data.as_mut() {
            Some(data) => data.append_rows(rows)?,
            None => self.data = Some(rows),
        }
        self.rebuild_assignments();
        Ok(())
    }

    /// Read a CSV file and append the selected columns.
    pub fn append_from_csv(
        &mut self,
        path: impl AsRef<Path>,
        selection: &ColumnSelection,
    ) -> PlotResult<()> {
        let source = Dataset::from_csv_path(path)?;
        self.append_data(&source, selection)
    }

    pub fn data(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    fn rebuild_assignments(&mut self) {
        self.reset_markers(None);
        self.reset_labels();
        self.reset_colors(None);
    }

    // Markers

    /// Assign markers to isolation values cyclically from `markerset`, or
    /// from the default palette when absent. A palette with fewer markers
    /// than isolation values is topped up with default markers it does not
    /// already contain.
    pub fn reset_markers(&mut self, markerset: Option<&[Marker]>) {
        let ivals = self.get_unique_ivals(false);
        let mut palette: Vec<Marker> = match markerset {
            Some(set) if !set.is_empty() => set.to_vec(),
            _ => self.default_markers.clone(),
        };
        for marker in &self.default_markers {
            if palette.len() >= ivals.len() {
                break;
            }
            if !palette.contains(marker) {
                palette.push(*marker);
            }
        }

        self.markers = ivals
            .into_iter()
            .zip(palette.iter().copied().cycle())
            .collect();
    }

    /// Change the marker of an existing isolation value.
    pub fn set_marker(&mut self, ival: &Value, marker: Marker) {
        match self.markers.get_mut(ival) {
            Some(m) => *m = marker,
            None => warn!("no isolation value '{}' to assign a marker to", ival),
        }
    }

    /// Marker of an isolation value; the first default marker when `None`
    /// or unknown.
    pub fn get_marker(&self, ival: Option<&Value>) -> Marker {
        let first = self.default_markers.first().copied().unwrap_or(Marker::Circle);
        ival.and_then(|v| self.markers.get(v).copied()).unwrap_or(first)
    }

    // Labels

    /// Label every isolation value with itself, passed through the format
    /// template when one is set.
    pub fn reset_labels(&mut self) {
        let labels = self
            .get_unique_ivals(false)
            .into_iter()
            .map(|ival| {
                let label = match self.label_format {
                    Some(ref template) => format_template(template, &ival),
                    None => ival.to_string(),
                };
                (ival, label)
            })
            .collect();
        self.labels = labels;
    }

    /// Change the label of an existing isolation value.
    pub fn set_label(&mut self, ival: &Value, label: &str) {
        match self.labels.get_mut(ival) {
            Some(l) => *l = label.to_string(),
            None => warn!("no isolation value '{}' to assign a label to", ival),
        }
    }

    pub fn get_label(&self, ival: &Value) -> String {
        self.labels
            .get(ival)
            .cloned()
            .unwrap_or_else(|| ival.to_string())
    }

    /// Format template for isolation labels, e.g. `"$K$ = {:.1e}"`.
    /// Relabels every isolation value.
    pub fn add_format(&mut self, template: &str) {
        self.label_format = Some(template.to_string());
        self.reset_labels();
    }

    // Colors

    /// Color the isolation values from a named colormap (`tab10` or
    /// `coolwarm`); the configured map is used when `None` or unknown.
    pub fn reset_colors(&mut self, cmap: Option<&str>) {
        let cmap = match cmap {
            None => self.colormap,
            Some(name) => name.parse().unwrap_or_else(|e| {
                warn!("{}, using {}", e, self.colormap);
                self.colormap
            }),
        };
        let ivals = self.get_unique_ivals(false);
        let colors = cmap.colors(ivals.len());
        self.colors = ivals.into_iter().zip(colors).collect();
    }

    pub fn set_color(&mut self, ival: &Value, color: impl Into<Color>) {
        match self.colors.get_mut(ival) {
            Some(c) => *c = color.into(),
            None => warn!("no isolation value '{}' to assign a color to", ival),
        }
    }

    pub fn get_color(&self, ival: &Value) -> Color {
        self.colors.get(ival).cloned().unwrap_or_default()
    }

    // Queries

    pub fn has_ivals(&self) -> bool {
        self.columns.as_ref().is_some_and(|c| c.isolate.is_some())
    }

    /// Isolation values in order of first appearance, or a single empty
    /// value when the figure has no isolation column.
    pub fn get_unique_ivals(&self, rev: bool) -> Vec<Value> {
        let column = self
            .columns
            .as_ref()
            .and_then(|c| c.isolate.as_deref())
            .zip(self.data.as_ref())
            .and_then(|(name, data)| data.column(name));
        let Some(column) = column else {
            return vec![Value::Text(String::new())];
        };
        let unique: IndexSet<Value> = column.iter().cloned().collect();
        let mut ivals: Vec<Value> = unique.into_iter().collect();
        if rev {
            ivals.reverse();
        }
        ivals
    }

    /// Cells of a column for the rows matching `ival`. The filter is ignored
    /// when the figure has no isolation column.
    fn column_values(&self, column: Option<&str>, ival: Option<&Value>) -> Vec<Value> {
        let (Some(data), Some(name)) = (self.data.as_ref(), column) else {
            return Vec::new();
        };
        let Some(values) = data.column(name) else {
            return Vec::new();
        };
        let isolate = self
            .columns
            .as_ref()
            .and_then(|c| c.isolate.as_deref())
            .and_then(|name| data.column(name));
        match (ival, isolate) {
            (Some(ival), Some(isolate)) => values
                .iter()
                .zip(isolate)
                .filter(|(_, i)| *i == ival)
                .map(|(v, _)| v.clone())
                .collect(),
            _ => values.to_vec(),
        }
    }

    fn numbers(values: Vec<Value>) -> Vec<f64> {
        values
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect()
    }

    pub fn get_xval_list(&self, ival: Option<&Value>) -> Vec<Value> {
        self.column_values(self.columns.as_ref().map(|c| c.x.as_str()), ival)
    }

    /// y values; text cells become NaN.
    pub fn get_yval_list(&self, ival: Option<&Value>) -> Vec<f64> {
        Self::numbers(self.column_values(self.columns.as_ref().map(|c| c.y.as_str()), ival))
    }

    /// Color column values; empty when the figure has no color column.
    pub fn get_cval_list(&self, ival: Option<&Value>) -> Vec<f64> {
        Self::numbers(self.column_values(
            self.columns.as_ref().and_then(|c| c.color.as_deref()),
            ival,
        ))
    }

    /// Points whose x and y are both finite numbers.
    pub fn get_xy_points(&self, ival: Option<&Value>) -> Vec<(f64, f64)> {
        let xs = Self::numbers(self.get_xval_list(ival));
        xs.into_iter()
            .zip(self.get_yval_list(ival))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }

    fn data_extent(&self, id: AxisId, positive_only: bool) -> Option<(f64, f64)> {
        let points = self.get_xy_points(None);
        points
            .iter()
            .map(|(x, y)| match id {
                AxisId::X => *x,
                AxisId::Y => *y,
            })
            .filter(|v| !positive_only || *v > 0.0)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    // Titles

    pub fn set_title_label(&mut self, text: Option<&str>, size: Option<i64>) {
        self.title = Label::new(text, size);
    }

    pub fn title_label(&self) -> &Label {
        &self.title
    }

    pub fn has_title_label(&self) -> bool {
        self.title.has_text()
    }

    pub fn set_subtitle_label(&mut self, text: Option<&str>, size: Option<i64>) {
        self.subtitle = Label::new(text, size);
    }

    pub fn subtitle_label(&self) -> &Label {
        &self.subtitle
    }

    pub fn has_subtitle_label(&self) -> bool {
        self.subtitle.has_text()
    }

    // Axes

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn x_axis_mut(&mut self) -> &mut Axis {
        &mut self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn y_axis_mut(&mut self) -> &mut Axis {
        &mut self.y_axis
    }

    fn axis(&self, id: AxisId) -> &Axis {
        match id {
            AxisId::X => &self.x_axis,
            AxisId::Y => &self.y_axis,
        }
    }

    fn axis_mut(&mut self, id: AxisId) -> &mut Axis {
        match id {
            AxisId::X => &mut self.x_axis,
            AxisId::Y => &mut self.y_axis,
        }
    }

    fn set_axis_label(&mut self, id: AxisId, text: &str, size: Option<i64>) {
        let size = size.unwrap_or(self.label_size as i64);
        self.axis_mut(id).set_label(Some(text), Some(size));
    }

    fn set_axis_limits(&mut self, id: AxisId, min: Option<f64>, max: Option<f64>) {
        let extent = self.data_extent(id, self.axis(id).is_logscale());
        let min = min.or(extent.map(|e| e.0));
        let max = max.or(extent.map(|e| e.1));
        if min.is_none() && max.is_none() {
            warn!("no {} axis limits given and no data to derive them from", id);
        }
        let axis = self.axis_mut(id);
        axis.reset_limits();
        axis.set_limits(min, max);
    }

    fn set_axis_ticks(
        &mut self,
        id: AxisId,
        minval: Option<f64>,
        maxval: Option<f64>,
        nmajor: Option<usize>,
        nminor: Option<usize>,
        format: Option<&str>,
    ) -> PlotResult<()> {
        let axis = self.axis(id);
        let log_base = axis.logscale_base();
        let usable = |v: &f64| v.is_finite() && (log_base.is_none() || *v > 0.0);
        let extent = self.data_extent(id, log_base.is_some());
        let min = [minval, axis.minimum(), extent.map(|e| e.0)]
            .into_iter()
            .flatten()
            .find(usable);
        let max = [maxval, axis.maximum(), extent.map(|e| e.1)]
            .into_iter()
            .flatten()
            .find(usable);
        let (Some(min), Some(max)) = (min, max) else {
            return Err(PlotError::InvalidConfig(format!(
                "{} axis ticks need limits or data to span",
                id
            )));
        };

        let axis = self.axis_mut(id);
        match log_base {
            None => {
                axis.set_major_ticks(Some(min), Some(max), nmajor, None)?;
                axis.reset_minor_ticks();
                if nminor != Some(0) {
                    axis.set_minor_ticks(nminor)?;
                }
            }
            Some(base) => {
                if max <= min {
                    return Err(PlotError::InvalidConfig(format!(
                        "{} axis tick maximum {} must be greater than minimum {}",
                        id, max, min
                    )));
                }
                let (lo, hi) = scale::pad_log_range(min, max, base, DEFAULT_PADDING_VALUE);
                axis.reset_limits();
                axis.set_limits(Some(lo), Some(hi));
                let powers = scale::log_ticks(lo, hi, base);
                let major = if powers.len() >= 2 {
                    if let Some(n) = nmajor {
                        debug!("{} axis is logarithmic, ignoring {} major ticks", id, n);
                    }
                    powers
                } else {
                    // Less than two powers of the base in range: round numbers instead.
                    let n = nmajor.filter(|n| *n >= 2).unwrap_or(LOG_FALLBACK_TICKS);
                    let nice = scale::nice_ticks(lo, hi, n);
                    debug!("{} axis spans less than two powers of {}, using {:?}", id, base, nice);
                    if nice.len() >= 2 {
                        nice
                    } else {
                        scale::linear_ticks(lo, hi, n)
                    }
                };
                axis.set_major_tick_values(major);
                axis.reset_minor_ticks();
                if nminor != Some(0) {
                    axis.set_minor_tick_values(scale::log_minor_ticks(lo, hi, base));
                }
            }
        }
        axis.set_tick_format(format);
        Ok(())
    }

    /// Set the x axis label; `size` falls back to the configured label size.
    pub fn set_xaxis_label(&mut self, text: &str, size: Option<i64>) {
        self.set_axis_label(AxisId::X, text, size);
    }

    /// Set the x axis limits. A missing bound is taken from the data,
    /// counting only positive values on a log axis.
    pub fn set_xaxis_limits(&mut self, min: Option<f64>, max: Option<f64>) {
        self.set_axis_limits(AxisId::X, min, max);
    }

    /// `"log"` or `"linear"`, with an optional log base.
    pub fn set_xaxis_scale(&mut self, kind: &str, base: Option<f64>) {
        self.x_axis.set_scale(Some(kind), base);
    }

    /// Compute x axis ticks between `minval` and `maxval`, falling back to
    /// the axis limits and then the data. Linear axes get `nmajor` evenly
    /// spaced ticks with `nminor` minor ticks per interval; log axes get
    /// ticks at powers of the base and ignore `nmajor`, unless the range
    /// holds fewer than two powers, in which case `nmajor` round-numbered
    /// ticks are placed instead. `format` is the tick label template.
    pub fn set_xaxis_ticks(
        &mut self,
        minval: Option<f64>,
        maxval: Option<f64>,
        nmajor: Option<usize>,
        nminor: Option<usize>,
        format: Option<&str>,
    ) -> PlotResult<()> {
        self.set_axis_ticks(AxisId::X, minval, maxval, nmajor, nminor, format)
    }

    pub fn set_yaxis_label(&mut self, text: &str, size: Option<i64>) {
        self.set_axis_label(AxisId::Y, text, size);
    }

    pub fn set_yaxis_limits(&mut self, min: Option<f64>, max: Option<f64>) {
        self.set_axis_limits(AxisId::Y, min, max);
    }

    pub fn set_yaxis_scale(&mut self, kind: &str, base: Option<f64>) {
        self.y_axis.set_scale(Some(kind), base);
    }

    pub fn set_yaxis_ticks(
        &mut self,
        minval: Option<f64>,
        maxval: Option<f64>,
        nmajor: Option<usize>,
        nminor: Option<usize>,
        format: Option<&str>,
    ) -> PlotResult<()> {
        self.set_axis_ticks(AxisId::Y, minval, maxval, nmajor, nminor, format)
    }

    /// Put both axes on a linear scale.
    pub fn set_linscale(&mut self) {
        self.x_axis.set_scale(Some("linear"), None);
        self.y_axis.set_scale(Some("linear"), None);
    }

    /// Put the selected axes on a log scale and recompute their ticks.
    pub fn set_logscale(&mut self, base: Option<f64>, logx: bool, logy: bool) {
        for (id, enabled) in [(AxisId::X, logx), (AxisId::Y, logy)] {
            if !enabled {
                continue;
            }
            self.axis_mut(id).set_scale(Some("log"), base);
            if let Err(e) = self.set_axis_ticks(id, None, None, None, None, None) {
                warn!("unable to place {} axis log ticks: {}", id, e);
            }
        }
    }

    /// Fit both axes' limits to the data.
    pub fn adjust_limits(&mut self) {
        if self.data.is_none() {
            return;
        }
        self.set_xaxis_limits(None, None);
        self.set_yaxis_limits(None, None);
    }

    // Output

    /// Where the figure is saved. An unknown `filetype` falls back to `.png`.
    pub fn set_saveas(&mut self, dir: &str, name: &str, filetype: &str) {
        self.save_dir = PathBuf::from(dir);
        self.file_name = if name.is_empty() {
            DEFAULT_FILE_NAME.to_string()
        } else {
            name.to_string()
        };
        self.file_type = FileType::from_extension(filetype).unwrap_or_else(|| {
            warn!("unsupported file type '{}', using {}", filetype, FileType::default());
            FileType::default()
        });
    }

    pub fn get_saveas(&self) -> PathBuf {
        self.save_dir
            .join(format!("{}{}", self.file_name, self.file_type.extension()))
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Absent resolution selects the default; anything below the minimum is
    /// raised to the minimum.
    pub fn set_dpi(&mut self, dpi: Option<u32>) {
        self.dpi = match dpi {
            None => DEFAULT_DPI,
            Some(d) if d < MINIMUM_DPI => {
                warn!("dpi {} is below the minimum, using {}", d, MINIMUM_DPI);
                MINIMUM_DPI
            }
            Some(d) => d,
        };
    }

    pub fn get_dpi(&self) -> u32 {
        self.dpi
    }

    /// Override the plot function's default size. Non-positive sizes are
    /// ignored.
    pub fn set_size_inches(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.size_inches = Some((width, height));
        } else {
            warn!("ignoring figure size {} x {} inches", width, height);
        }
    }

    pub fn size_inches(&self) -> Option<(f64, f64)> {
        self.size_inches
    }

    /// Switch to the publication preset: larger axis labels, higher
    /// resolution and a suffixed file name.
    pub fn set_publication(&mut self) {
        self.file_name.push_str(&self.publication.suffix);
        let size = self.publication.label_size as i64;
        self.x_axis.set_label_fontsize(size);
        self.y_axis.set_label_fontsize(size);
        self.set_dpi(Some(self.publication.dpi));
    }

    /// Write the working dataset as CSV next to the image.
    pub fn save_data(&self) -> PlotResult<PathBuf> {
        let data = self.data.as_ref().ok_or(PlotError::EmptyData)?;
        fs::create_dir_all(&self.save_dir)?;
        let path = self.save_dir.join(format!("{}.csv", self.file_name));
        data.to_csv_path(&path)?;
        Ok(path)
    }

    pub fn font_path(&self) -> Option<&Path> {
        self.font_path.as_deref()
    }

    pub fn set_font_path(&mut self, path: impl Into<PathBuf>) {
        self.font_path = Some(path.into());
    }
}

fn fmt_limit(limit: Option<f64>) -> String {
    limit.map_or_else(|| "None".to_string(), |l| l.to_string())
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Sub-Title: {}", self.subtitle)?;
        for (name, axis) in [("X-Axis", &self.x_axis), ("Y-Axis", &self.y_axis)] {
            writeln!(f)?;
            writeln!(f, "{}", name)?;
            writeln!(f, "Label: {}", axis.label())?;
            writeln!(f, "Minimum Axis Limit: {}", fmt_limit(axis.minimum()))?;
            writeln!(f, "Maximum Axis Limit: {}", fmt_limit(axis.maximum()))?;
            writeln!(f, "Scale: {}", axis.scale_name())?;
        }
        write!(f, "DPI: {}", self.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::style::cycle_color;
    use approx::assert_relative_eq;
    use std::io::Write as _;

    fn periods() -> Dataset {
        Dataset::new()
            .with_column("period", [1.0, 10.0, 100.0, 1.0, 10.0, 100.0])
            .unwrap()
            .with_column("10", [2.0, 3.0, 4.0, 1.0, 1.5, 2.0])
            .unwrap()
            .with_column("perm", [0.001, 0.001, 0.001, 0.01, 0.01, 0.01])
            .unwrap()
    }

    fn loaded() -> Figure {
        let mut fig = Figure::new();
        fig.load_data(&periods(), &ColumnSelection::new("period", "10").isolate("perm"))
            .unwrap();
        fig
    }

    fn write_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("plotfig-{}-{}.csv", name, std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_unique_ivals_and_filters() {
        let fig = loaded();
        assert!(fig.has_ivals());
        let ivals = fig.get_unique_ivals(false);
        assert_eq!(ivals, vec![Value::Number(0.001), Value::Number(0.01)]);
        assert_eq!(fig.get_unique_ivals(true)[0], Value::Number(0.01));

        assert_eq!(fig.get_yval_list(Some(&ivals[1])), vec![1.0, 1.5, 2.0]);
        assert_eq!(fig.get_yval_list(None).len(), 6);
        assert_eq!(fig.get_xy_points(Some(&ivals[0]))[2], (100.0, 4.0));
        assert!(fig.get_cval_list(None).is_empty());
    }

    #[test]
    fn test_no_isolation_column() {
        let mut fig = Figure::new();
        fig.load_data(&periods(), &ColumnSelection::new("period", "10")).unwrap();
        assert!(!fig.has_ivals());
        assert_eq!(fig.get_unique_ivals(false), vec![Value::from("")]);
        // Without an isolation column the filter is ignored.
        assert_eq!(fig.get_yval_list(Some(&Value::from("x"))).len(), 6);
        assert_eq!(fig.get_marker(None), Marker::Diamond);
    }

    #[test]
    fn test_missing_column_leaves_figure_untouched() {
        let mut fig = loaded();
        let before = fig.data().cloned();
        let err = fig.load_data(&periods(), &ColumnSelection::new("period", "missing"));
        assert!(matches!(err, Err(PlotError::MissingColumn(ref c)) if c == "missing"));
        assert_eq!(fig.data().cloned(), before);

        let path = write_csv("missing", "a,b\n1,2\n");
        let err = fig.append_from_csv(&path, &ColumnSelection::new("a", "b").isolate("perm"));
        assert!(matches!(err, Err(PlotError::MissingColumn(_))));
        assert_eq!(fig.data().cloned(), before);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_append_from_csv_with_constant_labels() {
        let path = write_csv("scatter", "mag_val,ss_val,ht_val,den\n0.1,0.9,0.2,1\n0.5,0.4,0.6,2\n");
        let mut fig = Figure::new();
        fig.append_from_csv(&path, &ColumnSelection::new("mag_val", "ss_val").color("den").label("SS"))
            .unwrap();
        fig.append_from_csv(&path, &ColumnSelection::new("mag_val", "ht_val").color("den").label("HT"))
            .unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(fig.data().unwrap().len(), 4);
        assert_eq!(fig.get_unique_ivals(false), vec![Value::from("SS"), Value::from("HT")]);
        assert_eq!(fig.get_yval_list(Some(&Value::from("HT"))), vec![0.2, 0.6]);
        assert_eq!(fig.get_cval_list(None), vec![1.0, 2.0, 1.0, 2.0]);

        fig.set_label(&Value::from("HT"), "Head-to-Tail ($HT$)");
        assert_eq!(fig.get_label(&Value::from("HT")), "Head-to-Tail ($HT$)");
        assert_eq!(fig.get_label(&Value::from("SS")), "SS");
    }

    #[test]
    fn test_marker_palette_is_topped_up() {
        let ds = Dataset::new()
            .with_column("x", [1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_column("y", [1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_column("i", ["a", "b", "c", "d"])
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&ds, &ColumnSelection::new("x", "y").isolate("i")).unwrap();

        fig.reset_markers(Some(&[Marker::Triangle, Marker::Circle]));
        let markers: Vec<Marker> = fig
            .get_unique_ivals(false)
            .iter()
            .map(|v| fig.get_marker(Some(v)))
            .collect();
        assert_eq!(
            markers,
            vec![Marker::Triangle, Marker::Circle, Marker::Diamond, Marker::TriangleDown]
        );

        fig.set_marker(&Value::from("a"), Marker::Star);
        assert_eq!(fig.get_marker(Some(&Value::from("a"))), Marker::Star);
    }

    #[test]
    fn test_markers_cycle_past_palette() {
        let ivals: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ds = Dataset::new()
            .with_column("x", ivals.clone())
            .unwrap()
            .with_column("y", ivals.clone())
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&ds, &ColumnSelection::new("x", "y").isolate("x")).unwrap();
        assert_eq!(fig.get_marker(Some(&Value::Number(8.0))), Marker::Diamond);
        assert_eq!(fig.get_marker(Some(&Value::Number(9.0))), Marker::Triangle);
    }

    #[test]
    fn test_label_format_and_colors() {
        let mut fig = loaded();
        fig.add_format("$K$ = {:.1e}");
        assert_eq!(fig.get_label(&Value::Number(0.001)), "$K$ = 1.0e-03");

        assert_eq!(fig.get_color(&Value::Number(0.01)).to_rgb(), cycle_color(1).to_rgb());
        fig.reset_colors(Some("coolwarm"));
        assert_eq!(fig.get_color(&Value::Number(0.001)).to_rgb(), (59, 76, 192));
        fig.set_color(&Value::Number(0.001), Color::RED);
        assert_eq!(fig.get_color(&Value::Number(0.001)), Color::RED);
    }

    #[test]
    fn test_limits_from_data() {
        let mut fig = loaded();
        fig.set_xaxis_limits(None, None);
        assert_eq!(fig.x_axis().minimum(), Some(1.0));
        assert_eq!(fig.x_axis().maximum(), Some(100.0));

        fig.set_yaxis_limits(Some(0.0), None);
        assert_eq!(fig.y_axis().minimum(), Some(0.0));
        assert_eq!(fig.y_axis().maximum(), Some(4.0));
    }

    #[test]
    fn test_log_limits_ignore_non_positive_data() {
        let ds = Dataset::new()
            .with_column("x", [-1.0, 0.0, 2.0, 50.0])
            .unwrap()
            .with_column("y", [1.0, 1.0, 1.0, 1.0])
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&ds, &ColumnSelection::new("x", "y")).unwrap();
        fig.set_xaxis_scale("log", None);
        fig.set_xaxis_limits(None, None);
        assert_eq!(fig.x_axis().minimum(), Some(2.0));
        assert_eq!(fig.x_axis().maximum(), Some(50.0));
    }

    #[test]
    fn test_linear_ticks() {
        let mut fig = loaded();
        fig.set_yaxis_ticks(Some(0.0), Some(1.0), Some(3), None, None).unwrap();
        assert_eq!(fig.y_axis().major_ticks(), Some(&[0.0, 0.5, 1.0][..]));
        assert_relative_eq!(fig.y_axis().minimum().unwrap(), -0.05, epsilon = 1e-12);
        assert_relative_eq!(fig.y_axis().maximum().unwrap(), 1.05, epsilon = 1e-12);
        assert_eq!(fig.y_axis().minor_ticks().unwrap().len(), 8);

        fig.set_xaxis_ticks(Some(0.0), Some(1.0), Some(4), Some(0), Some("{:.2f}"))
            .unwrap();
        assert_eq!(fig.x_axis().major_ticks().unwrap().len(), 4);
        assert!(!fig.x_axis().has_minor_ticks());
        assert_eq!(fig.x_axis().format_tick(0.5), "0.50");
    }

    #[test]
    fn test_log_ticks_from_data() {
        let mut fig = loaded();
        fig.set_logscale(None, true, false);
        assert!(fig.x_axis().is_logscale());
        assert!(fig.y_axis().is_linearscale());
        assert_eq!(fig.x_axis().major_ticks(), Some(&[1.0, 10.0, 100.0][..]));
        assert!(fig.x_axis().minimum().unwrap() < 1.0);
        assert!(fig.x_axis().has_minor_ticks());

        fig.set_linscale();
        assert!(fig.x_axis().is_linearscale());
    }

    #[test]
    fn test_log_ticks_within_one_decade() {
        let data = Dataset::new()
            .with_column("x", [2.0, 3.0, 5.0, 8.0])
            .unwrap()
            .with_column("y", [1.0, 2.0, 3.0, 4.0])
            .unwrap();
        let mut fig = Figure::new();
        fig.load_data(&data, &ColumnSelection::new("x", "y")).unwrap();
        fig.set_logscale(None, true, false);

        let major = fig.x_axis().major_ticks().unwrap();
        assert!(major.len() >= 2);
        assert_eq!(major, &[2.0, 4.0, 6.0, 8.0][..]);
        let (lo, hi) = (fig.x_axis().minimum().unwrap(), fig.x_axis().maximum().unwrap());
        assert!(major.iter().all(|t| *t >= lo && *t <= hi));

        fig.set_xaxis_ticks(None, None, Some(3), None, None).unwrap();
        assert!(fig.x_axis().major_ticks().unwrap().len() >= 2);
    }

    #[test]
    fn test_log_ticks_ignore_nmajor() {
        let mut fig = loaded();
        fig.set_xaxis_scale("log", None);
        fig.set_xaxis_ticks(None, None, Some(7), None, None).unwrap();
        assert_eq!(fig.x_axis().major_ticks(), Some(&[1.0, 10.0, 100.0][..]));
    }

    #[test]
    fn test_adjust_limits_fits_data() {
        let mut fig = loaded();
        fig.set_xaxis_limits(Some(-5.0), Some(5.0));
        fig.set_yaxis_limits(Some(10.0), Some(20.0));
        fig.adjust_limits();
        assert_eq!(fig.x_axis().minimum(), Some(1.0));
        assert_eq!(fig.x_axis().maximum(), Some(100.0));
        assert_eq!(fig.y_axis().minimum(), Some(1.0));
        assert_eq!(fig.y_axis().maximum(), Some(4.0));

        let mut empty = Figure::new();
        empty.set_xaxis_limits(Some(1.0), Some(2.0));
        empty.adjust_limits();
        assert_eq!(empty.x_axis().maximum(), Some(2.0));
    }

    #[test]
    fn test_ticks_without_data_fail() {
        let mut fig = Figure::new();
        assert!(fig.set_xaxis_ticks(None, None, None, None, None).is_err());
        assert!(!fig.x_axis().has_major_ticks());
    }

    #[test]
    fn test_saveas_and_dpi() {
        let mut fig = Figure::new();
        assert_eq!(fig.get_saveas(), PathBuf::from("./figure.png"));

        fig.set_saveas("out", "energy", ".jpg");
        assert_eq!(fig.file_type(), FileType::Png);
        fig.set_saveas("out", "energy", ".tif");
        assert_eq!(fig.get_saveas(), PathBuf::from("out/energy.tif"));

        fig.set_dpi(Some(50));
        assert_eq!(fig.get_dpi(), MINIMUM_DPI);
        fig.set_dpi(Some(150));
        assert_eq!(fig.get_dpi(), 150);
        fig.set_dpi(None);
        assert_eq!(fig.get_dpi(), DEFAULT_DPI);

        fig.set_size_inches(-1.0, 2.0);
        assert_eq!(fig.size_inches(), None);
        fig.set_size_inches(4.0, 3.0);
        assert_eq!(fig.size_inches(), Some((4.0, 3.0)));
    }

    #[test]
    fn test_publication_preset() {
        let mut fig = Figure::new();
        fig.set_xaxis_label("Cyclic Period ($s$)", None);
        fig.set_publication();
        assert_eq!(fig.get_saveas(), PathBuf::from("./figure_pub.png"));
        assert_eq!(fig.x_axis().label_fontsize(), 18);
        assert_eq!(fig.y_axis().label_fontsize(), 18);
        assert_eq!(fig.get_dpi(), 300);
    }

    #[test]
    fn test_with_config() {
        let config = PlotConfig::from_json(
            r#"{"dpi": 120, "markers": ["o", "q", "s"], "colormap": "coolwarm", "label_size": 14}"#,
        )
        .unwrap();
        let mut fig = Figure::with_config(&config);
        assert_eq!(fig.get_dpi(), 120);
        assert_eq!(fig.get_marker(None), Marker::Circle);
        fig.set_yaxis_label("Energy", None);
        assert_eq!(fig.y_axis().label_fontsize(), 14);
    }

    #[test]
    fn test_save_data() {
        let dir = std::env::temp_dir().join(format!("plotfig-save-data-{}", std::process::id()));
        let mut fig = loaded();
        fig.set_saveas(dir.to_str().unwrap(), "periods", ".png");
        let path = fig.save_data().unwrap();
        let reread = Dataset::from_csv_path(&path).unwrap();
        assert_eq!(reread.len(), 6);
        assert!(reread.has_column("perm"));
        let _ = fs::remove_dir_all(&dir);

        assert!(matches!(Figure::new().save_data(), Err(PlotError::EmptyData)));
    }

    #[test]
    fn test_display() {
        let mut fig = Figure::new();
        fig.set_title_label(Some("Energy"), None);
        fig.set_xaxis_limits(Some(0.0), Some(1.0));
        let out = fig.to_string();
        assert!(out.starts_with("Title: Energy (font size: 12)"));
        assert!(out.contains("X-Axis\nLabel: "));
        assert!(out.contains("Minimum Axis Limit: 0\nMaximum Axis Limit: 1"));
        assert!(out.ends_with("DPI: 200"));
    }
}
