//! Conversion engine contract.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{DocumentFormat, Result};

/// One engine invocation over staged files.
///
/// For y-format input, `input` is the unpacked `body.txt` with its `media/`
/// directory beside it. For y-format output, the engine writes `output`
/// (a `body.txt`) and places attachments in a `media/` directory beside it.
#[derive(Debug, Clone, Copy)]
pub struct EngineJob<'a> {
    pub input: &'a Path,
    pub input_format: DocumentFormat,
    pub output: &'a Path,
    pub output_format: DocumentFormat,
    /// Request-scoped scratch directory the engine may write to
    pub working_dir: &'a Path,
    pub environment: &'a BTreeMap<String, String>,
    pub timeout: Duration,
}

/// A synchronous document conversion engine.
///
/// Engines must fail loudly: an `Ok` return promises the output was written.
/// Timeouts are failures. Serializing access to a shared engine instance is
/// the implementation's business.
pub trait Engine {
    fn convert(&self, job: &EngineJob<'_>) -> Result<()>;
}

impl<T: Engine + ?Sized> Engine for &T {
    fn convert(&self, job: &EngineJob<'_>) -> Result<()> {
        (**self).convert(job)
    }
}

impl<T: Engine + ?Sized> Engine for Box<T> {
    fn convert(&self, job: &EngineJob<'_>) -> Result<()> {
        (**self).convert(job)
    }
}

impl<T: Engine + ?Sized> Engine for Arc<T> {
    fn convert(&self, job: &EngineJob<'_>) -> Result<()> {
        (**self).convert(job)
    }
}
