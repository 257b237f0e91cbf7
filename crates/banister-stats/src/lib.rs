//! Order statistics used by the Banister optimizers.
//!
//! This crate provides the small set of statistical tools the genetic algorithm
//! needs to rank populations and report on their convergence:
//!
//! - **Order statistics**: sorting, argsort, median, quantiles and extremum indices
//! - **Fitness summaries**: five-number summaries (min, quartiles, max) of a population
//!
//! # Modules
//!
//! - [`order`]: Sorting and order statistics over `f64` slices
//! - [`summary`]: Five-number summaries for convergence reports
//!
//! # NaN Handling
//!
//! The functions follow a fail-fast convention for NaN values: extremum searches
//! report the position of the first NaN instead of skipping it, and [`order::min_max`]
//! returns `(NaN, NaN)` as soon as one is found. Empty inputs yield NaN for every
//! value-returning statistic and index `0` for index-returning ones.
//!
//! # Examples
//!
//! ## Ranking values
//!
//! ```
//! use banister_stats::order;
//!
//! let values = [0.3, -1.0, 2.5];
//! assert_eq!(order::sort_index(&values), vec![1, 0, 2]);
//! assert_eq!(order::max_index(&values), 2);
//! ```
//!
//! ## Summarizing a population
//!
//! ```
//! use banister_stats::summary::FitnessSummary;
//!
//! let summary = FitnessSummary::new(&[4.0, 1.0, 3.0, 2.0, 5.0]);
//! assert_eq!(summary.min, 1.0);
//! assert_eq!(summary.median, 3.0);
//! assert_eq!(summary.max, 5.0);
//! ```

pub mod order;
pub mod summary;
