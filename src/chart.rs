//! The efficiency frontier chart: fitted curve, dominated region and
//! labelled deployments.

use std::path::Path;
use tracing::{debug, info};

use crate::{
    Error,
    dataset::{AnchorPoint, DeploymentPoint, ANCHORS, DEPLOYMENTS},
    frontier::{FrontierCurve, Samples},
    pyplot::{self, Axes, Figure},
};

/// Default location of the rendered chart.
pub const DEFAULT_OUTPUT: &str = "/mnt/data/efficiency_frontier_bitloops.png";

/// Bitloops brand color.
pub const BITLOOPS_PURPLE: &str = "#7404e4";

pub const TITLE: &str =
    "Efficiency Frontier of Intelligence: Right Tool for the Right Work";
pub const XLABEL: &str = "Task drift & long-tailness (low → high)";
pub const YLABEL: &str = "Effective outcomes per unit cost (higher is better)";
pub const FRONTIER_LABEL: &str = "Efficiency frontier (best achievable)";
pub const DOMINATED_LABEL: &str = "Dominated deployments";

/// Visual parameters of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Width and height in inches.
    pub figsize: (f64, f64),
    pub dpi: f64,
    /// Number of points at which the frontier is evaluated.
    pub samples: usize,
    pub color: &'static str,
    pub line_width: f64,
    pub fill_alpha: f64,
    /// Marker area in points².
    pub marker_size: f64,
    pub marker_color: &'static str,
    pub marker_zorder: f64,
    /// Offset of the labels from their marker, in points.
    pub label_offset: (f64, f64),
    pub label_fontsize: f64,
    pub grid_linestyle: &'static str,
    pub grid_linewidth: f64,
    pub legend_loc: &'static str,
    pub legend_fontsize: f64,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            figsize: (11., 6.5),
            dpi: 200.,
            samples: 400,
            color: BITLOOPS_PURPLE,
            line_width: 3.,
            fill_alpha: 0.12,
            marker_size: 70.,
            marker_color: "black",
            marker_zorder: 3.,
            label_offset: (6., 6.),
            label_fontsize: 9.,
            grid_linestyle: ":",
            grid_linewidth: 0.7,
            legend_loc: "upper right",
            legend_fontsize: 9.,
        }
    }
}

/// A deployment as drawn: a marker and its left-aligned label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker<'a> {
    pub label: &'a str,
    pub at: (f64, f64),
    /// Position of the label relative to `at`, in points.
    pub text_offset: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct FrontierChart<'a> {
    deployments: &'a [DeploymentPoint],
    curve: FrontierCurve,
    samples: Samples,
    style: Style,
}

impl FrontierChart<'static> {
    /// The chart of the built-in deployments.
    pub fn bitloops() -> Result<Self, Error> {
        FrontierChart::new(&ANCHORS, &DEPLOYMENTS, Style::default())
    }
}

impl<'a> FrontierChart<'a> {
    /// Fit the frontier through `anchors` and sample it.
    pub fn new(anchors: &[AnchorPoint], deployments: &'a [DeploymentPoint],
               style: Style) -> Result<Self, Error> {
        let curve = FrontierCurve::fit(anchors)?;
        let samples = curve.sample(style.samples);
        Ok(FrontierChart { deployments, curve, samples, style })
    }

    pub fn curve(&self) -> &FrontierCurve { &self.curve }

    pub fn samples(&self) -> &Samples { &self.samples }

    pub fn style(&self) -> &Style { &self.style }

    /// One marker per deployment, in the order they are drawn.
    pub fn markers(&self) -> impl Iterator<Item = Marker<'a>> + '_ {
        let text_offset = self.style.label_offset;
        self.deployments.iter().map(move |d| Marker {
            label: d.label, at: (d.x, d.y), text_offset })
    }

    /// Draw the chart on a new axes of `fig`.
    pub fn draw(&self, fig: &Figure) -> Result<Axes, Error> {
        let s = &self.style;
        let mut ax = fig.subplots()?;
        let (x, y) = (self.samples.x(), self.samples.y());
        ax.xy(x, y).linewidth(s.line_width).color(s.color)
            .label(FRONTIER_LABEL).plot()?;
        ax.fill_between(x, y).color(s.color).alpha(s.fill_alpha)
            .label(DOMINATED_LABEL).plot()?;
        for m in self.markers() {
            let (xi, yi) = m.at;
            ax.scatter(&[xi], &[yi]).size(s.marker_size).zorder(s.marker_zorder)
                .color(s.marker_color).plot()?;
            let (dx, dy) = m.text_offset;
            ax.annotate(m.label, m.at).offset_points(dx, dy).ha("left")
                .fontsize(s.label_fontsize).draw()?;
        }
        debug!(markers = self.deployments.len(), "drew deployments");
        ax.set_xlabel(XLABEL)?
            .set_ylabel(YLABEL)?
            .set_title(TITLE)?
            .grid(s.grid_linestyle, s.grid_linewidth)?
            .legend(s.legend_loc, s.legend_fontsize)?;
        fig.tight_layout()?;
        Ok(ax)
    }

    /// Draw the chart on a new pyplot figure, so that it can be
    /// displayed with [`pyplot::show`].
    pub fn render(&self) -> Result<Figure, Error> {
        let fig = pyplot::figure(self.style.figsize)?;
        self.draw(&fig)?;
        Ok(fig)
    }

    /// Write `fig` to `path` at the chart resolution.
    pub fn save(&self, fig: &Figure, path: impl AsRef<Path>)
                -> Result<(), Error> {
        let path = path.as_ref();
        fig.save().dpi(self.style.dpi).to_file(path)?;
        info!(path = %path.display(), dpi = self.style.dpi, "wrote chart");
        Ok(())
    }

    /// Draw the chart on a standalone figure and write it to `path`.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let fig = Figure::new(self.style.figsize)?;
        self.draw(&fig)?;
        self.save(&fig, path)
    }
}
