// crates/riskarea-core/src/pipeline.rs

//! # Ingestion Orchestrator
//!
//! One invocation handles one uploaded object:
//! download -> expand -> for each member: classify -> (skip | load ->
//! normalize -> persist). The first failing member aborts the invocation;
//! rows already appended for earlier members stay in the store.

use crate::archive;
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::event::{ObjectRef, RawUpload, TriggerEvent};
use crate::format::FileFormat;
use crate::loader;
use crate::normalize::normalize;
use crate::sink::RecordSink;
use crate::source::ObjectSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Outcome of an invocation as reported to the invoking infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Typed outcome of a completed invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Members normalized and appended.
    pub persisted: usize,
    /// Members with an unsupported extension.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberOutcome {
    Persisted,
    Skipped,
}

impl InvocationResult {
    pub fn success(body: String) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    pub fn failure(body: String) -> Self {
        Self {
            status_code: 500,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

pub struct Ingestor<S, K> {
    source: S,
    sink: K,
    config: IngestConfig,
}

impl<S: ObjectSource, K: RecordSink> Ingestor<S, K> {
    pub fn new(source: S, sink: K, config: IngestConfig) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Entry point for a trigger payload. Never fails: every error becomes a
    /// 500 result carrying its message.
    pub fn handle(&self, event: &TriggerEvent) -> InvocationResult {
        let outcome = event.object().and_then(|object| {
            self.process(&object).map(|report| (object, report))
        });

        match outcome {
            Ok((object, report)) => {
                tracing::info!(
                    key = %object.key,
                    persisted = report.persisted,
                    skipped = report.skipped,
                    "upload processed"
                );
                InvocationResult::success(format!(
                    "Arquivo {} processado e carregado para a tabela {}.",
                    object.key,
                    self.sink.target()
                ))
            }
            Err(err) if err.is_download() => {
                tracing::error!(error = %err, "object download failed");
                InvocationResult::failure(format!("Erro ao baixar o arquivo: {err}"))
            }
            Err(err) => {
                tracing::error!(error = %err, "upload processing failed");
                InvocationResult::failure(format!("Erro ao processar o arquivo: {err}"))
            }
        }
    }

    /// Runs the whole pipeline for one object.
    ///
    /// Scratch files live in a fresh directory under `scratch_dir` that is
    /// removed when this returns.
    pub fn process(&self, object: &ObjectRef) -> Result<IngestReport> {
        let scratch = archive::scratch_dir(&self.config.scratch_dir)?;

        let upload = self.download(object, scratch.path())?;

        let members_dir = scratch.path().join("members");
        fs::create_dir_all(&members_dir)?;
        let members = archive::expand(upload.path(), &members_dir)?;

        members
            .iter()
            .try_fold(IngestReport::default(), |mut report, member| {
                match self.ingest_member(member)? {
                    MemberOutcome::Persisted => report.persisted += 1,
                    MemberOutcome::Skipped => report.skipped += 1,
                }
                Ok(report)
            })
    }

    fn download(&self, object: &ObjectRef, scratch: &Path) -> Result<RawUpload> {
        let name = object.file_name();
        if name.is_empty() {
            return Err(IngestError::download(&object.key, "object key has no file name"));
        }
        let path = scratch.join(name);
        self.source.fetch(object, &path)?;
        Ok(RawUpload {
            object: object.clone(),
            path,
        })
    }

    fn ingest_member(&self, member: &Path) -> Result<MemberOutcome> {
        let format = match FileFormat::classify(member) {
            Ok(format) => format,
            Err(IngestError::UnsupportedFormat { path, extension }) => {
                tracing::warn!(%path, %extension, "unsupported extension, member skipped");
                return Ok(MemberOutcome::Skipped);
            }
            Err(other) => return Err(other),
        };

        let collection = loader::load(member, format)?;
        let record = normalize(&collection)?;
        self.sink.append(&record)?;

        tracing::info!(
            member = %member.display(),
            nome = record.nome(),
            parts = record.area_risco().0.len(),
            target = self.sink.target(),
            "risk area persisted"
        );
        Ok(MemberOutcome::Persisted)
    }
}
