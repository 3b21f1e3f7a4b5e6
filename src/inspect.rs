use std::path::Path;
use tracing::{debug, info};

use crate::discovery::{ExtensionFilter, find_matching_files};
use crate::error::Result;
use crate::media::{MediaReader, OpenOutcome, VideoProperties};

/// Prints width, height and frame rate for the videos in a directory
pub struct Inspector {
    reader: Box<dyn MediaReader>,
    filter: ExtensionFilter,
}

impl Inspector {
    /// `extension` is matched case-sensitively against file names
    pub fn new(reader: Box<dyn MediaReader>, extension: &str) -> Self {
        Self {
            reader,
            filter: ExtensionFilter::case_sensitive([extension]),
        }
    }

    /// Open every matching file in `dir`, in name order.
    ///
    /// Files that do not open as video come back as `FailedToOpen`. Listing
    /// errors and reader errors other than that propagate.
    pub async fn inspect_dir(&self, dir: &Path) -> Result<Vec<(String, OpenOutcome)>> {
        info!("Inspecting videos in {}", dir.display());

        let files = find_matching_files(dir, &self.filter)?;
        let mut results = Vec::with_capacity(files.len());

        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            let outcome = self.reader.open(&path).await?;
            if outcome == OpenOutcome::FailedToOpen {
                debug!("Skipping {}: could not open as video", path.display());
            }
            results.push((name, outcome));
        }

        Ok(results)
    }

    /// Inspect `dir` and print one line per file that opened
    pub async fn print_dir(&self, dir: &Path) -> Result<usize> {
        let mut printed = 0;
        for (name, outcome) in self.inspect_dir(dir).await? {
            if let Some(line) = format_line(&name, &outcome) {
                println!("{}", line);
                printed += 1;
            }
        }
        Ok(printed)
    }
}

/// `<name>: <width>x<height> @ <fps>fps`, or `None` for a file that did not open
pub fn format_line(name: &str, outcome: &OpenOutcome) -> Option<String> {
    match outcome {
        OpenOutcome::Opened(VideoProperties {
            width,
            height,
            frame_rate,
        }) => Some(format!(
            "{}: {}x{} @ {}fps",
            name,
            width,
            height,
            format_fps(*frame_rate)
        )),
        OpenOutcome::FailedToOpen => None,
    }
}

/// Shortest round-trip float text; whole numbers keep one decimal ("30.0")
fn format_fps(fps: f64) -> String {
    if fps.is_finite() && fps.fract() == 0.0 {
        format!("{:.1}", fps)
    } else {
        format!("{}", fps)
    }
}
