use pyo3::PyErr;
use thiserror::Error;

use crate::frontier::FitError;

/// Possible errors when building or rendering the chart.
#[derive(Debug, Error)]
pub enum Error {
    /// The Python library "matplotlib" was not found.
    #[error("The matplotlib library has not been found.\n\
             Please install it.  See https://matplotlib.org/\n\
             If you use Anaconda, see https://github.com/PyO3/pyo3/issues/1554")]
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.
    #[error("A path contains an element that is not a directory or does \
             not exist")]
    FileNotFoundError,
    /// Permission denied to access or create the filesystem path.
    #[error("Permission denied to access or create the filesystem path")]
    PermissionError,
    /// Other Python errors.
    #[error("Python error: {0}")]
    Python(#[from] PyErr),
    /// The frontier curve could not be fitted.
    #[error("cannot fit the frontier curve: {0}")]
    Fit(#[from] FitError),
}
