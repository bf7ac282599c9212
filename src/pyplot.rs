//! Bindings to the part of [Matplotlib][] used to draw the chart.
//!
//! The interface stays close to Matplotlib's explicit one while
//! keeping a Rust flavor: plot calls are built with chained options
//! and finished with a call that returns a [`Result`].
//!
//! ```no_run
//! use efficiency_frontier::pyplot;
//! let fig = pyplot::Figure::new((6., 4.))?;
//! let mut ax = fig.subplots()?;
//! ax.xy(&[0., 1., 2.], &[1., 0., 2.]).color("black").linewidth(2.).plot()?;
//! fig.save().dpi(100.).to_file("target/xy.png")?;
//! # Ok::<(), efficiency_frontier::Error>(())
//! ```
//!
//! [Matplotlib]: https://matplotlib.org/

use std::path::Path;
use lazy_static::lazy_static;
use pyo3::{
    prelude::*,
    intern,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::PyDict,
};
use numpy::PyArray1;

use crate::Error;

macro_rules! getattr {
    ($py: ident, $lib: expr, $f: literal) => {
        $lib.bind($py).getattr(intern!($py, $f))
    };
}

macro_rules! meth {
    ($obj: expr, $m: ident, $py: ident -> $args: expr, $kwargs: expr) => {
        Python::with_gil(|$py| -> Result<(), Error> {
            let kwargs = $kwargs;
            $obj.bind($py).call_method(
                intern!($py, stringify!($m)), $args, Some(&kwargs))?;
            Ok(())
        })
    };
    ($obj: expr, $m: ident, $args: expr) => {
        Python::with_gil(|py| -> Result<(), Error> {
            $obj.bind(py).call_method1(intern!(py, stringify!($m)), $args)?;
            Ok(())
        })
    };
}

/// Import and return a handle to the module `$m`.
macro_rules! pyimport { ($m: literal) => {
    Python::with_gil(|py|
        PyModule::import_bound(py, $m).map(|m| m.unbind()))
}}

lazy_static! {
    // Import matplotlib modules.
    static ref FIGURE: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.figure")
    };
    static ref PYPLOT: Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.pyplot")
    };
}

/// Return a handle to the module `$m`.
/// ⚠ This may try to lock Python's GIL.  Make sure it is executed
/// outside a call to `Python::with_gil`.
macro_rules! pymod { ($m: ident) => {
    $m.as_ref().map_err(|_| Error::NoMatplotlib)
}}

/// Trait expressing that `Self` can be converted to a numpy.ndarray.
pub trait Data {
    fn to_numpy(&self, py: Python<'_>) -> PyObject;
}

impl<T> Data for T where T: AsRef<[f64]> + ?Sized {
    fn to_numpy(&self, py: Python<'_>) -> PyObject {
        PyArray1::from_slice_bound(py, self.as_ref()).into_any().unbind()
    }
}

/// The top level container for all the plot elements.
#[derive(Debug)]
pub struct Figure {
    fig: PyObject, // instance of matplotlib.figure.Figure
}

#[derive(Debug, Clone)]
pub struct Axes {
    ax: PyObject,
}

fn figsize_kwargs(py: Python<'_>, figsize: (f64, f64))
                  -> PyResult<Bound<'_, PyDict>> {
    let kwargs = PyDict::new_bound(py);
    kwargs.set_item("figsize", figsize)?;
    Ok(kwargs)
}

impl Figure {
    /// Return a new `Figure` of size `figsize` (width, height) in
    /// inches.  The figure is not managed by pyplot and thus cannot
    /// be displayed with [`show`].
    pub fn new(figsize: (f64, f64)) -> Result<Figure, Error> {
        let figure = pymod!(FIGURE)?;
        Python::with_gil(|py| {
            let fig = getattr!(py, figure, "Figure")?
                .call((), Some(&figsize_kwargs(py, figsize)?))?;
            Ok(Self { fig: fig.unbind() })
        })
    }

    /// Add a single [`Axes`] filling the figure.
    pub fn subplots(&self) -> Result<Axes, Error> {
        Python::with_gil(|py| {
            let ax = self.fig.bind(py).call_method0(intern!(py, "subplots"))?;
            Ok(Axes { ax: ax.unbind() })
        })
    }

    /// Adjust the padding so that labels and title fit in the figure.
    pub fn tight_layout(&self) -> Result<(), Error> {
        meth!(self.fig, tight_layout, ())
    }

    pub fn save(&self) -> Savefig {
        Savefig { fig: self.fig.clone(), dpi: None }
    }
}

pub struct Savefig {
    fig: PyObject,
    dpi: Option<f64>,
}

impl Savefig {
    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        if dpi > 0. {
            self.dpi = Some(dpi);
        } else {
            self.dpi = None;
        }
        self
    }

    /// Write the figure to `path`, overwriting any existing file.  The
    /// format is deduced from the extension.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            if let Some(dpi) = self.dpi {
                kwargs.set_item("dpi", dpi)?
            }
            self.fig.bind(py).call_method(
                intern!(py, "savefig"), (path.as_ref(),), Some(&kwargs)
            ).map_err(|e| {
                    if e.is_instance_of::<PyFileNotFoundError>(py) {
                        Error::FileNotFoundError
                    } else if e.is_instance_of::<PyPermissionError>(py) {
                        Error::PermissionError
                    } else {
                        Error::Python(e)
                    }
                })?;
            Ok(())
        })
    }
}


/// Return a new figure managed by pyplot, of size `figsize` in inches.
pub fn figure(figsize: (f64, f64)) -> Result<Figure, Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        let fig = getattr!(py, pyplot, "figure")?
            .call((), Some(&figsize_kwargs(py, figsize)?))?;
        Ok(Figure { fig: fig.unbind() })
    })
}

/// Display all open figures.  With a non-interactive backend, this
/// does nothing beyond a warning emitted by Matplotlib.
pub fn show() -> Result<(), Error> {
    let pyplot = pymod!(PYPLOT)?;
    Python::with_gil(|py| {
        getattr!(py, pyplot, "show")?.call0()?;
        Ok(())
    })
}


impl Axes {
    /// Plot `y` versus `x` as a line.
    #[must_use]
    pub fn xy<'a, D>(&'a mut self, x: &'a D, y: &'a D) -> XY<'a, D>
    where D: Data + ?Sized {
        // We mutably borrow `self` to reflect that the final `.plot()`
        // will mutate the underlying Python object.
        XY { axes: self, options: PlotOptions::new(), x, y }
    }

    /// Fill the area between the curve (`x`, `y`) and the horizontal
    /// line `y = 0`.
    #[must_use]
    pub fn fill_between<'a, D>(&'a mut self, x: &'a D, y: &'a D)
                               -> FillBetween<'a, D>
    where D: Data + ?Sized {
        FillBetween { axes: self, options: PlotOptions::new(), x, y }
    }

    /// Draw a marker at each (`x[i]`, `y[i]`).
    #[must_use]
    pub fn scatter<'a, D>(&'a mut self, x: &'a D, y: &'a D) -> Scatter<'a, D>
    where D: Data + ?Sized {
        Scatter { axes: self, options: PlotOptions::new(), x, y,
                  size: None }
    }

    /// Write `text` next to the point `xy` (in data coordinates).
    #[must_use]
    pub fn annotate<'a>(&'a mut self, text: &'a str, xy: (f64, f64))
                        -> Annotate<'a> {
        Annotate { axes: self, text, xy, offset: None, ha: None,
                   fontsize: None }
    }

    pub fn set_title(&mut self, v: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_title, (v,))?;
        Ok(self)
    }

    pub fn set_xlabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_xlabel, (label,))?;
        Ok(self)
    }

    pub fn set_ylabel(&mut self, label: &str) -> Result<&mut Self, Error> {
        meth!(self.ax, set_ylabel, (label,))?;
        Ok(self)
    }

    /// Show the grid lines with the given style (e.g. ":", "--").
    pub fn grid(&mut self, linestyle: &str, linewidth: f64)
                -> Result<&mut Self, Error> {
        meth!(self.ax, grid, py -> (true,), {
            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("linestyle", linestyle)?;
            kwargs.set_item("linewidth", linewidth)?;
            kwargs })?;
        Ok(self)
    }

    /// Place a legend for the labelled plots at `loc`
    /// (e.g. "upper right", "best").
    pub fn legend(&mut self, loc: &str, fontsize: f64)
                  -> Result<&mut Self, Error> {
        meth!(self.ax, legend, py -> (), {
            let kwargs = PyDict::new_bound(py);
            kwargs.set_item("loc", loc)?;
            kwargs.set_item("fontsize", fontsize)?;
            kwargs })?;
        Ok(self)
    }

    /// Return the strings of all texts (annotations included) drawn
    /// on the axes, in the order they were added.
    pub fn texts(&self) -> Result<Vec<String>, Error> {
        Python::with_gil(|py| {
            let texts = self.ax.bind(py).getattr(intern!(py, "texts"))?;
            let mut v: Vec<String> = Vec::with_capacity(texts.len()?);
            for t in texts.iter()? {
                let s = t?.call_method0(intern!(py, "get_text"))?;
                v.push(s.extract()?);
            }
            Ok(v)
        })
    }

    /// Return the Python class names of the collections drawn on the
    /// axes (e.g. "PathCollection" for each scatter call), in the order
    /// they were added.
    pub fn collections(&self) -> Result<Vec<String>, Error> {
        Python::with_gil(|py| {
            let cols = self.ax.bind(py).getattr(intern!(py, "collections"))?;
            let mut v: Vec<String> = Vec::with_capacity(cols.len()?);
            for c in cols.iter()? {
                let name = c?.getattr(intern!(py, "__class__"))?
                    .getattr(intern!(py, "__name__"))?;
                v.push(name.extract()?);
            }
            Ok(v)
        })
    }
}

#[derive(Clone)]
struct PlotOptions<'a> {
    label: &'a str,
    color: Option<&'a str>,
    linewidth: Option<f64>,
    alpha: Option<f64>,
    zorder: Option<f64>,
}

impl<'a> PlotOptions<'a> {
    fn new() -> PlotOptions<'static> {
        PlotOptions { label: "", color: None, linewidth: None,
                      alpha: None, zorder: None }
    }

    fn kwargs<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let kwargs = PyDict::new_bound(py);
        if !self.label.is_empty() {
            kwargs.set_item("label", self.label)?
        }
        if let Some(c) = self.color {
            kwargs.set_item("color", c)?
        }
        if let Some(w) = self.linewidth {
            kwargs.set_item("linewidth", w)?
        }
        if let Some(a) = self.alpha {
            kwargs.set_item("alpha", a)?
        }
        if let Some(z) = self.zorder {
            kwargs.set_item("zorder", z)?
        }
        Ok(kwargs)
    }
}

/// Declare methods to set the options assuming `self.options` exists.
macro_rules! set_plotoptions { () => {
    /// Legend entry.  Unlabelled plots do not appear in the legend.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.options.label = label;
        self
    }

    /// Any Matplotlib color specification, e.g. "black" or "#7404e4".
    #[must_use]
    pub fn color(mut self, color: &'a str) -> Self {
        self.options.color = Some(color);
        self
    }

    #[must_use]
    pub fn linewidth(mut self, w: f64) -> Self {
        self.options.linewidth = Some(w);
        self
    }

    /// Opacity, between 0 (transparent) and 1 (opaque).
    #[must_use]
    pub fn alpha(mut self, a: f64) -> Self {
        self.options.alpha = Some(a);
        self
    }

    /// Drawing order; artists with higher zorder are drawn on top.
    #[must_use]
    pub fn zorder(mut self, z: f64) -> Self {
        self.options.zorder = Some(z);
        self
    }
}}

#[must_use]
pub struct XY<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    options: PlotOptions<'a>,
    x: &'a D,
    y: &'a D,
}

impl<'a, D> XY<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    /// Plot the data with the options specified in [`XY`].
    pub fn plot(self) -> Result<(), Error> {
        meth!(self.axes.ax, plot,
              py -> (self.x.to_numpy(py), self.y.to_numpy(py)),
              self.options.kwargs(py)?)
    }
}

#[must_use]
pub struct FillBetween<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    options: PlotOptions<'a>,
    x: &'a D,
    y: &'a D,
}

impl<'a, D> FillBetween<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    pub fn plot(self) -> Result<(), Error> {
        meth!(self.axes.ax, fill_between,
              py -> (self.x.to_numpy(py), 0., self.y.to_numpy(py)),
              self.options.kwargs(py)?)
    }
}

#[must_use]
pub struct Scatter<'a, D>
where D: ?Sized {
    axes: &'a Axes,
    options: PlotOptions<'a>,
    x: &'a D,
    y: &'a D,
    size: Option<f64>,
}

impl<'a, D> Scatter<'a, D>
where D: Data + ?Sized {
    set_plotoptions!();

    /// Marker area in points².
    pub fn size(mut self, s: f64) -> Self {
        self.size = Some(s);
        self
    }

    pub fn plot(self) -> Result<(), Error> {
        meth!(self.axes.ax, scatter,
              py -> (self.x.to_numpy(py), self.y.to_numpy(py)),
              {
                  let kwargs = self.options.kwargs(py)?;
                  if let Some(s) = self.size {
                      kwargs.set_item("s", s)?
                  }
                  kwargs })
    }
}

#[must_use]
pub struct Annotate<'a> {
    axes: &'a Axes,
    text: &'a str,
    xy: (f64, f64),
    offset: Option<(f64, f64)>,
    ha: Option<&'a str>,
    fontsize: Option<f64>,
}

impl<'a> Annotate<'a> {
    /// Place the text at (`dx`, `dy`) points from the annotated point.
    pub fn offset_points(mut self, dx: f64, dy: f64) -> Self {
        self.offset = Some((dx, dy));
        self
    }

    /// Horizontal alignment of the text: "left", "center" or "right".
    pub fn ha(mut self, ha: &'a str) -> Self {
        self.ha = Some(ha);
        self
    }

    pub fn fontsize(mut self, size: f64) -> Self {
        self.fontsize = Some(size);
        self
    }

    pub fn draw(self) -> Result<(), Error> {
        meth!(self.axes.ax, annotate, py -> (self.text, self.xy), {
            let kwargs = PyDict::new_bound(py);
            if let Some(xytext) = self.offset {
                kwargs.set_item("textcoords", "offset points")?;
                kwargs.set_item("xytext", xytext)?;
            }
            if let Some(ha) = self.ha {
                kwargs.set_item("ha", ha)?
            }
            if let Some(size) = self.fontsize {
                kwargs.set_item("fontsize", size)?
            }
            kwargs })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    #[ignore = "needs matplotlib"]
    fn basic_png() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("basic.png");
        let fig = Figure::new((4., 3.))?;
        let mut ax = fig.subplots()?;
        ax.xy(&[1., 2., 3., 4.], &[1., 4., 2., 3.]).label("line").plot()?;
        ax.fill_between(&[1., 2., 3., 4.], &[1., 4., 2., 3.])
            .alpha(0.2).plot()?;
        ax.scatter(&[2.], &[4.]).size(30.).color("black").plot()?;
        ax.annotate("peak", (2., 4.)).offset_points(6., 6.).ha("left")
            .draw()?;
        ax.grid(":", 0.7)?.legend("upper right", 9.)?;
        fig.save().dpi(50.).to_file(&path)?;
        assert!(path.metadata()?.len() > 0);
        assert_eq!(ax.texts()?, vec!["peak".to_string()]);
        let cols = ax.collections()?;
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[1], "PathCollection");
        Ok(())
    }

    #[test]
    #[ignore = "needs matplotlib"]
    fn missing_directory() -> TestResult {
        let fig = Figure::new((2., 2.))?;
        fig.subplots()?;
        let r = fig.save().to_file("/nonexistent-dir/sub/out.png");
        assert!(matches!(r, Err(Error::FileNotFoundError)), "{r:?}");
        Ok(())
    }
}
