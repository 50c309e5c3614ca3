//! Generation core: field value resolution, the job state machine and the
//! batch controller that turns dataset rows into a paginated PDF.

pub mod controller;
pub mod error;
pub mod job;
pub mod log;
pub mod mapping;
pub mod progress;
pub mod resolve;

pub use controller::{GenerationController, GenerationOutcome};
pub use error::GenerationError;
pub use job::{GenerationJob, GenerationRequest, JobStatus, RowRange};
pub use self::log::{GenerationLog, GenerationLogEntry, Severity};
pub use mapping::FieldMapping;
pub use progress::{CancelToken, ProgressHandle};
pub use resolve::{Resolution, resolve};
