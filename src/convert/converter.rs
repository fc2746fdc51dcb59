//! Conversion orchestration.

use std::fs;
use std::path::Path;

use super::config::ConverterConfig;
use super::engine::{Engine, EngineJob};
use super::staging::{ConversionState, WorkingArea};
use crate::common::{Document, DocumentFormat, Error, Result};
use crate::metadata::{DetachedEngine, FieldValue, MetadataCodec, MetadataRecord, PropertyEngine};
use crate::registry::{self, FormatEntry};
use crate::yformat::{self, BODY_ENTRY, YContainer};

/// Converts documents to and from the y-formats through an [`Engine`], and
/// reads and writes their metadata.
///
/// A converter holds no per-request state; each call stages its files in a
/// fresh [`WorkingArea`] that is removed before the call returns.
#[derive(Debug, Clone)]
pub struct Converter<E, P = DetachedEngine> {
    engine: E,
    metadata: MetadataCodec<P>,
    config: ConverterConfig,
}

impl<E: Engine> Converter<E> {
    pub fn new(engine: E, config: ConverterConfig) -> Self {
        let metadata = MetadataCodec::detached().with_policy(config.unknown_field_policy);
        Self {
            engine,
            metadata,
            config,
        }
    }
}

impl<E: Engine, P: PropertyEngine> Converter<E, P> {
    /// Use `properties` for metadata of non y-format documents.
    pub fn with_property_engine<Q: PropertyEngine>(self, properties: Q) -> Converter<E, Q> {
        Converter {
            engine: self.engine,
            metadata: MetadataCodec::new(properties).with_policy(self.config.unknown_field_policy),
            config: self.config,
        }
    }

    #[inline]
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline]
    pub fn metadata_codec(&self) -> &MetadataCodec<P> {
        &self.metadata
    }

    /// Target formats a document of `mimetype` can be exported to.
    pub fn allowed_conversion_formats(&self, mimetype: &str) -> &'static [FormatEntry] {
        registry::allowed_targets(mimetype)
    }

    /// Convert `source` into the format named by the `target` extension.
    pub fn convert(&self, source: Document, target: &str) -> Result<Document> {
        let source_format = source
            .format()
            .ok_or_else(|| Error::UnsupportedFormat(source.extension().to_string()))?;
        let target_format = DocumentFormat::from_extension(target)
            .ok_or_else(|| Error::UnsupportedFormat(target.to_string()))?;

        let span = tracing::info_span!(
            "convert",
            from = %source_format,
            to = %target_format,
            bytes = source.len()
        );
        let _guard = span.enter();

        // Decode before anything touches the disk: a malformed source never
        // reaches the engine, nor comes back as a same-format result.
        let source_container = if source_format.is_yformat() {
            Some(yformat::decode(source.data())?)
        } else {
            None
        };

        if source_format == target_format {
            tracing::debug!("source already in target format");
            return Ok(source);
        }

        let mut area = WorkingArea::create(self.config.working_dir.as_deref())?;
        let input = match &source_container {
            Some(container) => container.unpack_into(&area.input_dir())?,
            None => area.stage_file(&format!("document.{source_format}"), source.data())?,
        };
        let output_dir = area.output_dir();
        fs::create_dir_all(&output_dir)?;
        let output = if target_format.is_yformat() {
            output_dir.join(BODY_ENTRY)
        } else {
            output_dir.join(format!("result.{target_format}"))
        };
        area.advance(ConversionState::Staged);
        area.advance(ConversionState::EngineInvoked);
        let job = EngineJob {
            input: &input,
            input_format: source_format,
            output: &output,
            output_format: target_format,
            working_dir: area.path(),
            environment: &self.config.environment,
            timeout: self.config.timeout(),
        };
        let outcome = self
            .engine
            .convert(&job)
            .map_err(|e| match e {
                Error::EngineFailed(_) => e,
                other => Error::EngineFailed(other.to_string()),
            })
            .and_then(|()| {
                if target_format.is_yformat() {
                    collect_container(&output_dir, target_format, source_container.as_ref())
                } else {
                    read_output(&output)
                }
            });

        match outcome {
            Ok(data) => {
                area.advance(ConversionState::Succeeded);
                tracing::info!(bytes = data.len(), "conversion succeeded");
                Ok(Document::new(data, target_format.extension()))
            },
            Err(err) => {
                let state = match err {
                    Error::ContainerInvalid(_) => ConversionState::ContainerInvalid,
                    _ => ConversionState::EngineFailed,
                };
                area.advance(state);
                tracing::warn!(error = %err, "conversion failed");
                Err(err)
            },
        }
    }

    /// Metadata of `document`.
    ///
    /// y-format documents without a sidecar are converted to their
    /// engine-facing format and read through the property engine.
    pub fn get_metadata(&self, document: &Document) -> Result<MetadataRecord> {
        if let Some(record) = self.metadata.extract_from_container(document)? {
            return Ok(record);
        }
        if let Some(format) = document.format().filter(|f| f.is_yformat())
            && !document.is_empty()
        {
            let facing = format.engine_facing();
            let converted = self.convert(document.clone(), facing.extension())?;
            return self
                .metadata
                .extract_from_engine(converted.data(), facing.extension());
        }
        self.metadata.extract(document)
    }

    /// Copy of `document` with `fields` written.
    pub fn set_metadata<I, K>(&self, document: Document, fields: I) -> Result<Document>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        self.metadata.inject(document, fields)
    }
}

fn read_output(output: &Path) -> Result<Vec<u8>> {
    let data = fs::read(output).map_err(|e| {
        Error::EngineFailed(format!("missing output {}: {e}", output.display()))
    })?;
    if data.is_empty() {
        return Err(Error::EngineFailed("engine produced empty output".to_string()));
    }
    Ok(data)
}

fn collect_container(
    output_dir: &Path,
    target: DocumentFormat,
    source: Option<&YContainer>,
) -> Result<Vec<u8>> {
    if !output_dir.join(BODY_ENTRY).is_file() {
        return Err(Error::EngineFailed(format!("engine wrote no {BODY_ENTRY}")));
    }
    let mut container = YContainer::collect_from(output_dir).map_err(invalid)?;

    let produced = container.header().tag.format();
    if produced != Some(target) {
        return Err(Error::ContainerInvalid(format!(
            "expected a {} body, engine wrote {}",
            target,
            container.header().tag
        )));
    }
    if container.header().is_future_version() {
        tracing::warn!(header = %container.header(), "engine wrote a newer body version");
    }

    if let Some(sidecar) = source.and_then(YContainer::metadata) {
        container.set_metadata(Some(sidecar.clone()));
    }

    let bytes = yformat::encode(&container)?;
    // The encoded form must read back; decode validates media references.
    yformat::decode(&bytes).map_err(invalid)?;
    Ok(bytes)
}

fn invalid(err: Error) -> Error {
    Error::ContainerInvalid(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a fixed body for y-format targets and copies the input otherwise.
    #[derive(Default)]
    struct EchoEngine {
        calls: AtomicUsize,
    }

    impl Engine for EchoEngine {
        fn convert(&self, job: &EngineJob<'_>) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if job.output_format.is_yformat() {
                fs::write(job.output, b"XLSY;v10;0;echo")?;
            } else {
                fs::copy(job.input, job.output)?;
            }
            Ok(())
        }
    }

    fn converter(base: &Path) -> Converter<EchoEngine> {
        Converter::new(
            EchoEngine::default(),
            ConverterConfig::new().with_working_dir(base),
        )
    }

    #[test]
    fn test_unknown_formats() {
        let base = tempfile::tempdir().unwrap();
        let converter = converter(base.path());
        let doc = Document::new(b"x".to_vec(), "xlsx");
        assert!(matches!(
            converter.convert(doc, "numbers"),
            Err(Error::UnsupportedFormat(ext)) if ext == "numbers"
        ));
        assert!(matches!(
            converter.convert(Document::new(b"x".to_vec(), "bin"), "xlsy"),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!(converter.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_same_format_is_untouched() {
        let base = tempfile::tempdir().unwrap();
        let converter = converter(base.path());
        let doc = Document::new(b"XLSY;v10;0;cells".to_vec(), "xlsy");
        assert_eq!(converter.convert(doc.clone(), ".XLSY").unwrap(), doc);
        assert_eq!(converter.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_malformed_same_format_source_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        let converter = converter(base.path());
        let doc = Document::new(b"not a y-format body at all".to_vec(), "xlsy");
        assert!(matches!(
            converter.convert(doc, "xlsy"),
            Err(Error::MalformedContainer { .. })
        ));
        assert_eq!(converter.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_malformed_source_never_reaches_engine() {
        let base = tempfile::tempdir().unwrap();
        let converter = converter(base.path());
        let doc = Document::new(b"no header".to_vec(), "xlsy");
        assert!(matches!(
            converter.convert(doc, "xlsx"),
            Err(Error::MalformedContainer { .. })
        ));
        assert_eq!(converter.engine().calls.load(Ordering::SeqCst), 0);
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sidecar_is_carried_between_yformats() {
        let base = tempfile::tempdir().unwrap();
        let converter = converter(base.path());
        let source = converter
            .set_metadata(
                Document::new(Vec::new(), "docy"),
                [("Title", FieldValue::from("kept"))],
            )
            .unwrap();
        let converted = converter.convert(source, "xlsy").unwrap();
        let record = converter.get_metadata(&converted).unwrap();
        assert_eq!(record.text(crate::metadata::MetadataField::Title), Some("kept"));
    }

    #[test]
    fn test_allowed_conversion_formats_delegates() {
        let base = tempfile::tempdir().unwrap();
        let converter = converter(base.path());
        assert_eq!(
            converter.allowed_conversion_formats("application/x-asc-spreadsheet; charset=utf-8"),
            registry::allowed_targets("application/x-asc-spreadsheet")
        );
        assert!(converter.allowed_conversion_formats("image/png").is_empty());
    }
}
