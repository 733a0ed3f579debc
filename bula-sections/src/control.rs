//! Cooperative cancellation for long analysis runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{AuditError, AuditResult};

/// Deadline and cancel flag, checked between units of work.
///
/// The mapper checks once per line and the differ once per section. The
/// default value never stops a run.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Stop as soon as `flag` becomes `true`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn check(&self) -> AuditResult<()> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(AuditError::Cancelled);
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(AuditError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_never_stops() {
        assert!(RunControl::new().check().is_ok());
    }

    #[test]
    fn cancel_flag_stops() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = RunControl::new().with_cancel_flag(flag.clone());
        assert!(control.check().is_ok());
        flag.store(true, Ordering::Relaxed);
        assert!(matches!(control.check(), Err(AuditError::Cancelled)));
    }

    #[test]
    fn past_deadline_stops() {
        let control = RunControl::new().with_deadline(Instant::now());
        assert!(matches!(control.check(), Err(AuditError::DeadlineExceeded)));
    }
}
