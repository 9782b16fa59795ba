use crate::error::AnalyticsResult;
use crate::id::TenantId;

/// A tenant-scoped analytics computation.
///
/// Jobs own an immutable input snapshot supplied by callers; this keeps the
/// analytics crates storage-agnostic. Running a job must not mutate anything
/// and must be deterministic for a given input.
pub trait AnalyticsJob: Send + Sync {
    type Input: Send + Sync;
    type Output;

    /// The tenant this job belongs to.
    fn tenant_id(&self) -> TenantId;

    /// The input snapshot the job will compute over.
    fn input(&self) -> &Self::Input;

    /// Short, stable label used in logs.
    fn kind(&self) -> &'static str;

    /// Execute the computation.
    fn run(&self) -> AnalyticsResult<Self::Output>;
}
