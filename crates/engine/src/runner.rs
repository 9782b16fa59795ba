use std::time::Instant;

use tracing::{debug, warn};

use stockwise_core::{AnalyticsError, AnalyticsJob, AnalyticsResult, TenantId};

/// Tenant scope for execution.
///
/// - `Any`: run jobs for any tenant (shared workers, the HTTP service).
/// - `Tenant`: only accept jobs for the specified tenant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    Any,
    Tenant(TenantId),
}

impl TenantScope {
    pub fn allows(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Any => true,
            TenantScope::Tenant(t) => *t == tenant_id,
        }
    }
}

/// Executes analytics jobs.
pub trait JobRunner: Send + Sync {
    fn scope(&self) -> TenantScope;

    fn run<J: AnalyticsJob>(&self, job: J) -> AnalyticsResult<J::Output> {
        if !self.scope().allows(job.tenant_id()) {
            warn!(kind = job.kind(), tenant_id = %job.tenant_id(), "job rejected by runner scope");
            return Err(AnalyticsError::invalid(
                "tenant scope violation (job tenant not allowed by runner)",
            ));
        }
        let started = Instant::now();
        let out = job.run();
        debug!(
            kind = job.kind(),
            tenant_id = %job.tenant_id(),
            ok = out.is_ok(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "analytics job finished"
        );
        out
    }
}

/// Runs jobs immediately on the calling thread.
#[derive(Debug, Copy, Clone)]
pub struct LocalJobRunner {
    scope: TenantScope,
}

impl LocalJobRunner {
    pub fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self::new(TenantScope::Tenant(tenant_id))
    }
}

impl Default for LocalJobRunner {
    fn default() -> Self {
        Self::new(TenantScope::Any)
    }
}

impl JobRunner for LocalJobRunner {
    fn scope(&self) -> TenantScope {
        self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo {
        tenant_id: TenantId,
        input: u32,
    }

    impl AnalyticsJob for Echo {
        type Input = u32;
        type Output = u32;

        fn tenant_id(&self) -> TenantId {
            self.tenant_id
        }

        fn input(&self) -> &u32 {
            &self.input
        }

        fn kind(&self) -> &'static str {
            "test.echo"
        }

        fn run(&self) -> AnalyticsResult<u32> {
            Ok(self.input)
        }
    }

    #[test]
    fn scoped_runner_rejects_foreign_tenants() {
        let mine = TenantId::new();
        let runner = LocalJobRunner::for_tenant(mine);
        assert_eq!(runner.run(Echo { tenant_id: mine, input: 7 }), Ok(7));
        assert!(matches!(
            runner.run(Echo {
                tenant_id: TenantId::new(),
                input: 7
            }),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        let anyone = Echo {
            tenant_id: TenantId::new(),
            input: 1,
        };
        assert_eq!(LocalJobRunner::default().run(anyone), Ok(1));
    }
}
