//! Chart of the efficiency frontier of intelligence, drawn with
//! [Matplotlib][] through [PyO3][].
//!
//! Usage
//! -----
//!
//! A cubic is fitted through the dominant deployment of each task
//! regime ([`dataset::ANCHORS`]); it is the frontier of the best
//! achievable outcome per unit of cost.  The area below it holds the
//! dominated deployments, and every known deployment
//! ([`dataset::DEPLOYMENTS`]) is drawn as a labelled marker.
//!
//! ```no_run
//! use efficiency_frontier::FrontierChart;
//! FrontierChart::bitloops()?.to_file("target/frontier.png")?;
//! # Ok::<(), efficiency_frontier::Error>(())
//! ```
//!
//! [Matplotlib]: https://matplotlib.org/
//! [PyO3]: https://pyo3.rs/

pub mod chart;
pub mod dataset;
mod error;
pub mod frontier;
pub mod pyplot;

pub use chart::{FrontierChart, Style};
pub use error::Error;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
