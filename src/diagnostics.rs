//! Warning sink shared by the detectors and the comparison engine.
//!
//! Data-quality findings (unrecognized document types, reconciliation
//! mismatches) are reported here instead of being raised as errors. The
//! default sink forwards to the `log` crate; [`MemoryDiagnostics`] collects
//! messages so callers and tests can inspect them without touching global
//! logger configuration.

use std::sync::Mutex;

use log::warn;

pub trait Diagnostics {
    fn warning(&self, message: &str);
}

/// Forwards every warning to `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn warning(&self, message: &str) {
        warn!("{message}");
    }
}

/// Buffers warnings in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    warnings: Mutex<Vec<String>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .expect("diagnostics mutex poisoned")
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings
            .lock()
            .expect("diagnostics mutex poisoned")
            .is_empty()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn warning(&self, message: &str) {
        self.warnings
            .lock()
            .expect("diagnostics mutex poisoned")
            .push(message.to_string());
    }
}
