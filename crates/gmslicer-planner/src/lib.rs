//! # GMSlicer Planner
//!
//! Turns extracted domain data into a motor command table.
//!
//! - **DomainLinker**: joins geometry and magnetization on domain id
//! - **TraversalSorter**: bottom-up by Z layer, then nearest to the Z axis
//! - **CommandEncoder**: quantizes positions and angles into motor steps
//! - **Pipeline**: runs the whole chain and produces a [`RunReport`]

pub mod encoder;
pub mod error;
pub mod linker;
pub mod pipeline;
pub mod report;
pub mod summary;
pub mod table;
pub mod traversal;

pub use encoder::CommandEncoder;
pub use error::{PipelineError, PipelineResult, TableError, TableResult};
pub use linker::{DomainLinker, DuplicateAssignment, DuplicateGeometry, Linkage, LinkageGap};
pub use pipeline::{Pipeline, PipelineOutput};
pub use report::RunReport;
pub use summary::{AxisTotals, MotionSummary, StepDelta};
pub use table::CommandTable;
pub use traversal::{is_traversal_ordered, LayeringPolicy, TraversalSorter};
