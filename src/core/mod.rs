//! The task-orchestration core: parameter snapshot, radix resolution,
//! transcription steps, task building/execution, the shared processing
//! pipeline, and output actions.
pub mod output;
pub mod params;
pub mod pipeline;
pub mod radix;
pub mod step;
pub mod task;
