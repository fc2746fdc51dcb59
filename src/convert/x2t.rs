//! Engine backed by the x2t converter binary.
//!
//! x2t is driven through an XML parameter file naming the input and output
//! files and their numeric format codes:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <TaskQueueDataConvert>
//!   <m_sFileFrom>/tmp/yconvert-x/document.xlsx</m_sFileFrom>
//!   <m_nFormatFrom>257</m_nFormatFrom>
//!   <m_sFileTo>/tmp/yconvert-x/output/body.txt</m_sFileTo>
//!   <m_nFormatTo>8194</m_nFormatTo>
//! </TaskQueueDataConvert>
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use super::config::ConverterConfig;
use super::engine::{Engine, EngineJob};
use crate::common::{DocumentFormat, Error, Result};

/// Name of the parameter file written into the working area.
pub const PARAMS_FILE: &str = "params.xml";

/// How much of the engine's stderr is kept in error messages.
const STDERR_TAIL: usize = 512;

/// x2t format code of `format` when read from.
pub fn input_format_code(format: DocumentFormat) -> u32 {
    match format {
        DocumentFormat::Docx => 65,
        DocumentFormat::Odt => 67,
        DocumentFormat::Pptx => 129,
        DocumentFormat::Odp => 131,
        DocumentFormat::Xlsx => 257,
        DocumentFormat::Ods => 259,
        DocumentFormat::Pdf => 513,
        DocumentFormat::Docy => 4097,
        DocumentFormat::Xlsy => 4098,
        DocumentFormat::Ppty => 4099,
    }
}

/// x2t format code of `format` when written to. y-formats are produced
/// through their canvas variants.
pub fn output_format_code(format: DocumentFormat) -> u32 {
    match format {
        DocumentFormat::Docy => 8193,
        DocumentFormat::Xlsy => 8194,
        DocumentFormat::Ppty => 8195,
        other => input_format_code(other),
    }
}

/// Runs `x2t <params.xml>` for each job.
#[derive(Debug, Clone)]
pub struct X2tEngine {
    binary: PathBuf,
}

impl X2tEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(&config.engine_path)
    }

    #[inline]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    async fn run(&self, params: &Path, job: &EngineJob<'_>) -> Result<()> {
        let mut command = tokio::process::Command::new(&self.binary);
        command
            .arg(params)
            .current_dir(job.working_dir)
            .env_clear()
            .envs(job.environment)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            Error::EngineFailed(format!("cannot start {}: {e}", self.binary.display()))
        })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(job.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| Error::EngineFailed(format!("waiting for x2t: {e}")))?,
            Err(_) => {
                return Err(Error::EngineFailed(format!(
                    "x2t timed out after {}s",
                    job.timeout.as_secs()
                )));
            },
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let start = stderr.len().saturating_sub(STDERR_TAIL);
            let tail = stderr.get(start..).unwrap_or(&stderr);
            return Err(Error::EngineFailed(format!(
                "x2t exited with {}: {}",
                output.status,
                tail.trim()
            )));
        }
        Ok(())
    }
}

impl Engine for X2tEngine {
    fn convert(&self, job: &EngineJob<'_>) -> Result<()> {
        let params = job.working_dir.join(PARAMS_FILE);
        std::fs::write(&params, render_params(job)?)?;

        tracing::info!(
            binary = %self.binary.display(),
            from = %job.input_format,
            to = %job.output_format,
            timeout_secs = job.timeout.as_secs(),
            "running x2t"
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(&params, job))
    }
}

/// Render the parameter file for `job`.
pub fn render_params(job: &EngineJob<'_>) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let input = job.input.to_string_lossy();
    let output = job.output.to_string_lossy();
    let format_from = input_format_code(job.input_format).to_string();
    let format_to = output_format_code(job.output_format).to_string();

    writer
        .create_element("TaskQueueDataConvert")
        .write_inner_content(|w| {
            for (name, value) in [
                ("m_sFileFrom", input.as_ref()),
                ("m_nFormatFrom", format_from.as_str()),
                ("m_sFileTo", output.as_ref()),
                ("m_nFormatTo", format_to.as_str()),
            ] {
                w.create_element(name)
                    .write_text_content(BytesText::new(value))?;
            }
            Ok(())
        })?;

    Ok(writer.into_inner())
}
