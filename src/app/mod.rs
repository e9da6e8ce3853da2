// Application layer: batch runs that plan and export to storage.

pub mod batch;
pub mod export;

pub use batch::{BatchReport, BatchRunner};
pub use export::PlanExporter;
