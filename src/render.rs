use crate::chart::{draw_chart, speedup_chart, ChartSpec};
use crate::error::ChartError;
use crate::table::Table;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Something that can put a chart in front of the user.
pub trait Renderer {
    fn show(&mut self, chart: &ChartSpec) -> Result<()>;
}

/// Build the speedup chart for `table` and hand it to `renderer`.
pub fn render_speedup<R: Renderer + ?Sized>(table: &Table, renderer: &mut R) -> Result<()> {
    let chart = speedup_chart(table);
    log::debug!(
        "rendering {} series over {} categories",
        chart.series.len(),
        chart.categories.len()
    );
    renderer.show(&chart)
}

/// Image formats the file renderer can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ChartError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("svg") => Ok(OutputFormat::Svg),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(ChartError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Draw `chart` to an image file at `path`.
pub fn write_chart(chart: &ChartSpec, path: &Path) -> Result<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, chart.size).into_drawing_area();
            draw_chart(chart, &root)?;
            root.present()?;
        }
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, chart.size).into_drawing_area();
            draw_chart(chart, &root)?;
            root.present()?;
        }
    }
    Ok(())
}

/// Writes the chart to an SVG or PNG file.
#[derive(Debug, Clone)]
pub struct FileRenderer {
    path: PathBuf,
}

impl FileRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Renderer for FileRenderer {
    fn show(&mut self, chart: &ChartSpec) -> Result<()> {
        // Fail on the extension before touching the filesystem
        OutputFormat::from_path(&self.path)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }

        write_chart(chart, &self.path)
            .with_context(|| format!("Failed to write chart to {}", self.path.display()))?;
        println!("Generated: {}", self.path.display());
        Ok(())
    }
}

/// Shows the chart in an external viewer and blocks until the user
/// dismisses it.
///
/// The chart is written to a temporary SVG that lives until `show` returns.
/// Without a viewer command the platform opener is used.
#[derive(Debug, Clone, Default)]
pub struct ViewerRenderer {
    viewer: Option<String>,
}

impl ViewerRenderer {
    pub fn new(viewer: Option<String>) -> Self {
        Self { viewer }
    }

    fn launch(&self, path: &Path) -> Result<(), ChartError> {
        let (program, args) = match &self.viewer {
            Some(cmd) => {
                let mut parts = cmd.split_whitespace().map(str::to_string);
                let program = parts.next().ok_or_else(|| {
                    ChartError::DisplayUnavailable("empty viewer command".to_string())
                })?;
                (program, parts.collect::<Vec<_>>())
            }
            None => default_opener(),
        };

        log::debug!("launching viewer: {} {:?} {}", program, args, path.display());

        let status = Command::new(&program)
            .args(&args)
            .arg(path)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| {
                ChartError::DisplayUnavailable(format!("failed to launch '{program}': {e}"))
            })?;

        if !status.success() {
            return Err(ChartError::DisplayUnavailable(format!(
                "viewer '{program}' exited with {status}"
            )));
        }
        Ok(())
    }
}

impl Renderer for ViewerRenderer {
    fn show(&mut self, chart: &ChartSpec) -> Result<()> {
        check_display(|key| std::env::var(key).ok())?;

        let file = tempfile::Builder::new()
            .prefix("speedup-")
            .suffix(".svg")
            .tempfile()
            .context("Failed to create temporary chart file")?;
        let path = file.into_temp_path();

        write_chart(chart, &path)?;
        self.launch(&path)?;

        print!("Showing \"{}\". Press Enter to close... ", chart.title);
        let _ = io::stdout().flush();
        wait_for_dismiss(io::stdin().lock())?;

        path.close().context("Failed to remove temporary chart file")?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn default_opener() -> (String, Vec<String>) {
    ("open".to_string(), Vec::new())
}

#[cfg(windows)]
fn default_opener() -> (String, Vec<String>) {
    (
        "cmd".to_string(),
        vec!["/C".to_string(), "start".to_string(), String::new()],
    )
}

#[cfg(not(any(target_os = "macos", windows)))]
fn default_opener() -> (String, Vec<String>) {
    ("xdg-open".to_string(), Vec::new())
}

/// X11/Wayland desktops advertise themselves through the environment; other
/// platforms always have a window server.
fn check_display<F>(var: F) -> Result<(), ChartError>
where
    F: Fn(&str) -> Option<String>,
{
    if cfg!(any(target_os = "macos", windows)) {
        return Ok(());
    }

    let has = |key: &str| var(key).is_some_and(|v| !v.is_empty());
    if has("DISPLAY") || has("WAYLAND_DISPLAY") {
        Ok(())
    } else {
        Err(ChartError::DisplayUnavailable(
            "neither DISPLAY nor WAYLAND_DISPLAY is set".to_string(),
        ))
    }
}

/// Block until a line (or EOF) arrives on `input`.
fn wait_for_dismiss<R: BufRead>(mut input: R) -> Result<()> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to wait for the chart to be dismissed")?;
    Ok(())
}
