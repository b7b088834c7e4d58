pub mod engine;
pub mod outcome;

pub use engine::{build_matrix, evaluate};
pub use outcome::{
    ComplianceMatrix, Failure, IngestStats, MatrixRow, ResolvedCompound, ScreeningReport, Verdict,
};
