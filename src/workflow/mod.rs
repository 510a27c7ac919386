//! Workflow controller gating ingestion and analysis operations.
//!
//! Owns the entity store behind a single async mutex and applies each
//! operation's replace-or-append semantics. Every remote operation follows the
//! same shape: precondition check (input errors never reach the network), busy
//! count up, capture the session generation, issue the call, then re-lock and
//! apply only if the generation still matches. `clear_all` bumps the
//! generation, so a response that was in flight when the user cleared is
//! discarded instead of resurrecting stale data. The lock is never held across
//! an await.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, InputError};
use crate::model::{OverallCoverage, TestCase};
use crate::service::{
    HttpServiceClient, MappingSummary, RemoteService, ReportKind, ValidationSummary,
};
use crate::store::EntityStore;
use crate::views::{
    self, MappingFilter, MappingView, TestCaseFilter, TestCaseView, TraceabilityFilter,
    TraceabilityView, ValidationFilter, ValidationView,
};

/// Position in the ingestion → generation → validation/mapping → traceability
/// sequence.
///
/// Each successful operation sets its stage unconditionally, a linear step
/// tracker rather than a lattice: generating after validating moves the stage
/// back to `TestCasesAvailable`. Operation legality is decided by the
/// preconditions on each operation, not by the stage alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Empty,
    DocumentIngested,
    TestCasesAvailable,
    Validated,
    Mapped,
    TraceabilityBuilt,
}

/// User acknowledgment for the destructive clear operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Success summary for a document ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOutcome {
    pub chunks: u64,
    pub requirements: u64,
}

/// Success summary for an external test case import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    /// Cases appended to the local store from the uploaded file.
    pub appended: usize,
    /// Total cases the server reports holding after the merge.
    pub total_on_server: u64,
}

/// Success summary for a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub added: usize,
    pub total: usize,
}

/// Success summary for a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateOutcome {
    pub summary: ValidationSummary,
}

/// Success summary for a mapping run.
#[derive(Debug, Clone, Serialize)]
pub struct MapOutcome {
    pub summary: MappingSummary,
}

/// Success summary for a traceability build.
#[derive(Debug, Clone, Serialize)]
pub struct TraceabilityOutcome {
    pub coverage: OverallCoverage,
}

/// Success summary for an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub download_url: String,
}

/// Result of a clear request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearOutcome {
    Cleared,
    Declined,
}

struct SessionState {
    store: EntityStore,
    stage: Stage,
    generation: u64,
}

/// Gates which operations are legal and applies their store mutations.
///
/// An explicit value owned by the caller: independent controllers hold
/// independent sessions, so tests and embedders never share globals.
pub struct WorkflowController {
    service: Arc<dyn RemoteService>,
    session: Mutex<SessionState>,
    busy: AtomicUsize,
}

/// Reference-counted busy marker, decremented on drop.
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WorkflowController {
    /// Create a controller over the given remote service with an empty session.
    pub fn new(service: Arc<dyn RemoteService>) -> Self {
        Self {
            service,
            session: Mutex::new(SessionState {
                store: EntityStore::new(),
                stage: Stage::Empty,
                generation: 0,
            }),
            busy: AtomicUsize::new(0),
        }
    }

    /// Create a controller backed by the HTTP client from configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = HttpServiceClient::new(&config.service, config.request.clone())?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Current workflow stage.
    pub async fn stage(&self) -> Stage {
        self.session.lock().await.stage
    }

    /// Whether any remote operation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst) > 0
    }

    /// Submit a requirements document; the server extracts requirements
    /// asynchronously on its side, so the local store is untouched.
    pub async fn ingest_document(&self, path: &Path) -> AppResult<DocumentOutcome> {
        let (file_name, bytes) = read_upload(path).await?;
        let generation = self.session.lock().await.generation;
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.upload_document(&file_name, bytes).await?;

        let mut session = self.session.lock().await;
        self.check_generation(&session, generation, "document ingestion")?;
        session.stage = Stage::DocumentIngested;

        info!(
            chunks = response.chunks,
            requirements = response.requirements,
            "Document ingested"
        );
        Ok(DocumentOutcome {
            chunks: response.chunks,
            requirements: response.requirements,
        })
    }

    /// Upload an existing test case file and append its cases locally.
    ///
    /// The upload response carries only the server's total, so the file is
    /// parsed client-side for the append; the upload keeps the server's
    /// collection in sync with ours.
    pub async fn ingest_external_test_cases(&self, path: &Path) -> AppResult<ImportOutcome> {
        let (file_name, bytes) = read_upload(path).await?;
        let cases: Vec<TestCase> =
            serde_json::from_slice(&bytes).map_err(|e| InputError::TestCaseFile {
                message: format!("expected a JSON array of test cases: {}", e),
            })?;

        let generation = self.session.lock().await.generation;
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.upload_test_cases(&file_name, bytes).await?;

        let mut session = self.session.lock().await;
        self.check_generation(&session, generation, "test case import")?;
        let appended = cases.len();
        session.store.append_test_cases(cases);

        info!(
            appended,
            total_on_server = response.total_test_cases,
            "External test cases imported"
        );
        Ok(ImportOutcome {
            appended,
            total_on_server: response.total_test_cases,
        })
    }

    /// Generate test cases for a query and append them to the collection.
    pub async fn generate_test_cases(&self, query: &str) -> AppResult<GenerateOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery.into());
        }

        let generation = self.session.lock().await.generation;
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.generate_test_cases(query).await?;

        let mut session = self.session.lock().await;
        self.check_generation(&session, generation, "generation")?;
        let added = response.test_cases.len();
        session.store.append_test_cases(response.test_cases);
        session.stage = Stage::TestCasesAvailable;

        let total = session.store.test_cases().len();
        info!(query, added, total, "Test cases generated");
        Ok(GenerateOutcome { added, total })
    }

    /// Run the bulk validation pass and replace the validation collection.
    pub async fn validate_all(&self) -> AppResult<ValidateOutcome> {
        let generation = {
            let session = self.session.lock().await;
            if session.store.test_cases().is_empty() {
                return Err(InputError::NoTestCases {
                    operation: "validation",
                }
                .into());
            }
            session.generation
        };
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.validate_all().await?;

        let mut session = self.session.lock().await;
        self.check_generation(&session, generation, "validation")?;
        session
            .store
            .replace_validation_results(response.validation_results);
        session.stage = Stage::Validated;

        info!(
            valid = response.summary.valid,
            invalid = response.summary.invalid,
            "Validation run applied"
        );
        Ok(ValidateOutcome {
            summary: response.summary,
        })
    }

    /// Run the bulk mapping pass and replace the mapping collection.
    pub async fn map_all(&self) -> AppResult<MapOutcome> {
        let generation = {
            let session = self.session.lock().await;
            if session.store.test_cases().is_empty() {
                return Err(InputError::NoTestCases {
                    operation: "mapping",
                }
                .into());
            }
            session.generation
        };
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.map_all().await?;

        let mut session = self.session.lock().await;
        self.check_generation(&session, generation, "mapping")?;
        session
            .store
            .replace_mapping_results(response.mapping_results);
        session.stage = Stage::Mapped;

        info!(
            mapped = response.summary.mapped_test_cases,
            covered = response.summary.covered_requirements,
            "Mapping run applied"
        );
        Ok(MapOutcome {
            summary: response.summary,
        })
    }

    /// Build a fresh traceability matrix snapshot and replace the old one.
    ///
    /// No client-side precondition: the server recomputes the matrix from its
    /// own authoritative mapping data.
    pub async fn build_traceability(&self) -> AppResult<TraceabilityOutcome> {
        let generation = self.session.lock().await.generation;
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.build_traceability().await?;

        let mut session = self.session.lock().await;
        self.check_generation(&session, generation, "traceability")?;
        let matrix = response.into_matrix();
        let coverage = matrix.coverage.clone();
        session.store.replace_matrix(matrix);
        session.stage = Stage::TraceabilityBuilt;

        info!(
            total = coverage.total_requirements,
            covered = coverage.covered_requirements,
            percentage = coverage.coverage_percentage,
            "Traceability matrix applied"
        );
        Ok(TraceabilityOutcome { coverage })
    }

    /// Export a PDF report. Legal from any non-empty stage; never changes
    /// stage or store.
    pub async fn export_report(&self, kind: ReportKind) -> AppResult<ExportOutcome> {
        self.check_exportable().await?;
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.export_pdf(kind).await?;
        info!(url = %response.download_url, "PDF report ready");
        Ok(ExportOutcome {
            download_url: response.download_url,
        })
    }

    /// Export the matrix as a spreadsheet. Same gating as [`Self::export_report`].
    pub async fn export_excel(&self) -> AppResult<ExportOutcome> {
        self.check_exportable().await?;
        let _busy = BusyGuard::acquire(&self.busy);

        let response = self.service.export_excel().await?;
        info!(url = %response.download_url, "Spreadsheet ready");
        Ok(ExportOutcome {
            download_url: response.download_url,
        })
    }

    /// Empty all four collections and return to the initial stage.
    ///
    /// Requires explicit confirmation; declining leaves all state untouched.
    /// Bumps the session generation so responses still in flight are
    /// discarded instead of being applied to the fresh session.
    pub async fn clear_all(&self, confirmation: Confirmation) -> AppResult<ClearOutcome> {
        if confirmation == Confirmation::Declined {
            return Ok(ClearOutcome::Declined);
        }

        let mut session = self.session.lock().await;
        session.store.clear();
        session.stage = Stage::Empty;
        session.generation += 1;

        warn!(generation = session.generation, "All data cleared");
        Ok(ClearOutcome::Cleared)
    }

    /// Test case view, recomputed from the current store.
    pub async fn test_cases(&self, filter: TestCaseFilter) -> TestCaseView {
        let session = self.session.lock().await;
        views::test_case_view(&session.store, filter)
    }

    /// Validation view, recomputed from the current store.
    pub async fn validation(&self, filter: ValidationFilter) -> ValidationView {
        let session = self.session.lock().await;
        views::validation_view(&session.store, filter)
    }

    /// Mapping view, recomputed from the current store.
    pub async fn mapping(&self, filter: MappingFilter) -> MappingView {
        let session = self.session.lock().await;
        views::mapping_view(&session.store, filter)
    }

    /// Traceability view, recomputed from the current store.
    pub async fn traceability(&self, filter: TraceabilityFilter) -> TraceabilityView {
        let session = self.session.lock().await;
        views::traceability_view(&session.store, filter)
    }

    fn check_generation(
        &self,
        session: &SessionState,
        issued_at: u64,
        operation: &'static str,
    ) -> AppResult<()> {
        if session.generation != issued_at {
            warn!(operation, "Discarding stale response after clear");
            return Err(AppError::Stale { operation });
        }
        Ok(())
    }

    async fn check_exportable(&self) -> AppResult<()> {
        let session = self.session.lock().await;
        if session.stage == Stage::Empty {
            return Err(InputError::NothingToExport.into());
        }
        Ok(())
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Empty => write!(f, "empty"),
            Stage::DocumentIngested => write!(f, "document_ingested"),
            Stage::TestCasesAvailable => write!(f, "test_cases_available"),
            Stage::Validated => write!(f, "validated"),
            Stage::Mapped => write!(f, "mapped"),
            Stage::TraceabilityBuilt => write!(f, "traceability_built"),
        }
    }
}

async fn read_upload(path: &Path) -> AppResult<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| InputError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok((file_name, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceError, ServiceResult};
    use crate::service::{
        ExportResponse, GenerateResponse, MapResponse, TraceabilityResponse,
        UploadDocumentResponse, UploadTestCasesResponse, ValidateResponse,
    };

    /// Service stub that fails every call; preconditions must reject first.
    struct OfflineService;

    #[async_trait::async_trait]
    impl RemoteService for OfflineService {
        async fn upload_document(
            &self,
            _file_name: &str,
            _bytes: Vec<u8>,
        ) -> ServiceResult<UploadDocumentResponse> {
            Err(offline())
        }
        async fn upload_test_cases(
            &self,
            _file_name: &str,
            _bytes: Vec<u8>,
        ) -> ServiceResult<UploadTestCasesResponse> {
            Err(offline())
        }
        async fn generate_test_cases(&self, _query: &str) -> ServiceResult<GenerateResponse> {
            Err(offline())
        }
        async fn validate_all(&self) -> ServiceResult<ValidateResponse> {
            Err(offline())
        }
        async fn map_all(&self) -> ServiceResult<MapResponse> {
            Err(offline())
        }
        async fn build_traceability(&self) -> ServiceResult<TraceabilityResponse> {
            Err(offline())
        }
        async fn export_pdf(&self, _kind: ReportKind) -> ServiceResult<ExportResponse> {
            Err(offline())
        }
        async fn export_excel(&self) -> ServiceResult<ExportResponse> {
            Err(offline())
        }
    }

    fn offline() -> ServiceError {
        ServiceError::Api {
            status: 503,
            message: "offline".to_string(),
        }
    }

    fn controller() -> WorkflowController {
        WorkflowController::new(Arc::new(OfflineService))
    }

    #[tokio::test]
    async fn test_initial_session_is_empty() {
        let ctl = controller();
        assert_eq!(ctl.stage().await, Stage::Empty);
        assert!(!ctl.is_busy());
        assert!(ctl.test_cases(TestCaseFilter::All).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_call() {
        let ctl = controller();
        // OfflineService would return a service error; an input error proves
        // the call never went out.
        let err = ctl.generate_test_cases("   ").await.unwrap_err();
        assert!(err.is_input());
    }

    #[tokio::test]
    async fn test_validate_and_map_require_test_cases() {
        let ctl = controller();
        assert!(ctl.validate_all().await.unwrap_err().is_input());
        assert!(ctl.map_all().await.unwrap_err().is_input());
    }

    #[tokio::test]
    async fn test_exports_require_non_empty_stage() {
        let ctl = controller();
        let err = ctl.export_report(ReportKind::TestCases).await.unwrap_err();
        assert!(err.is_input());
        let err = ctl.export_excel().await.unwrap_err();
        assert!(err.is_input());
    }

    #[tokio::test]
    async fn test_declined_clear_is_a_no_op() {
        let ctl = controller();
        let outcome = ctl.clear_all(Confirmation::Declined).await.unwrap();
        assert_eq!(outcome, ClearOutcome::Declined);
        assert_eq!(ctl.stage().await, Stage::Empty);
    }

    #[tokio::test]
    async fn test_missing_upload_file_is_an_input_error() {
        let ctl = controller();
        let err = ctl
            .ingest_document(Path::new("/nonexistent/srs.pdf"))
            .await
            .unwrap_err();
        assert!(err.is_input());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Empty.to_string(), "empty");
        assert_eq!(Stage::TraceabilityBuilt.to_string(), "traceability_built");
    }
}
