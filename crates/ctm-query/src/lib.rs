//! Queries against a normalized thermal model.
//!
//! A [`QuerySession`] holds one normalized grid and answers the four query
//! types: a single point, a vertical profile, a vertical cross-section along
//! a geodesic and a horizontal slice. Each run validates the query against
//! the grid domain, plans the sample lattice, interpolates, assembles a
//! [`ResultTable`] and derives temperature statistics, geothermal gradients
//! and the metadata [`Header`] written in front of the data.
//!
//! ```ignore
//! let session = QuerySession::new(Arc::new(grid), descriptor, QueryConfig::default())?;
//! let outcome = session.run(&QuerySpec::VerticalProfile {
//!     lon: -117.5,
//!     lat: 34.0,
//!     depth_start: 0.0,
//!     depth_end: 50_000.0,
//!     depth_step: 1000.0,
//! })?;
//! write_outcome(std::io::stdout().lock(), OutputFormat::Csv, &outcome)?;
//! ```

pub mod config;
pub mod output;
pub mod query;
pub mod report;
pub mod session;
pub mod stats;
pub mod table;

pub use config::QueryConfig;
pub use output::{write_csv, write_gradients_csv, write_json, write_outcome, OutputFormat};
pub use query::{arange_inclusive, arange_len, linspace, slice_point_counts, QueryKind, QuerySpec};
pub use report::{build_header, Header};
pub use session::{QueryOutcome, QuerySession};
pub use stats::{gradient, max_gradient, profile_gradient, summarize, two_point_gradient, GradientRecord, TemperatureStats};
pub use table::{ResultRow, ResultTable};
