//! The batch run orchestrator.

use crate::audit;
use crate::core::{
    ArcScanApi, DomainSource, ListName, ListResult, RunError, RunResult, ScanApi, ScanPhase,
    ScanType,
};
use crate::manager::poll::PollConfig;
use crate::manager::session::ScanSession;
use crate::store::ResultStore;

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

/// Outcome counts for one orchestrator run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier of the run, for log correlation.
    pub run_id: Uuid,

    /// The scan profile the run used.
    pub scan_type: ScanType,

    /// Lists whose results were saved during this run.
    pub completed: usize,

    /// Lists skipped because a completed result already existed.
    pub skipped: usize,

    /// Lists completed by resuming a scan from a stored id.
    pub resumed: usize,

    /// Lists whose stored scan was lost and had to be resubmitted.
    pub resubmitted: usize,
}

impl RunSummary {
    fn new(run_id: Uuid, scan_type: ScanType) -> Self {
        Self {
            run_id,
            scan_type,
            completed: 0,
            skipped: 0,
            resumed: 0,
            resubmitted: 0,
        }
    }
}

/// Builder for creating a `ListOrchestrator`.
pub struct ListOrchestratorBuilder {
    api: Option<ArcScanApi>,
    source: Option<Box<dyn DomainSource>>,
    results_dir: Option<PathBuf>,
    scan_type: Option<ScanType>,
    lists: Vec<ListName>,
    overwrite: bool,
    poll: PollConfig,
    scan_id_sink: Option<Box<dyn Write + Send>>,
}

impl ListOrchestratorBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            api: None,
            source: None,
            results_dir: None,
            scan_type: None,
            lists: Vec::new(),
            overwrite: false,
            poll: PollConfig::default(),
            scan_id_sink: None,
        }
    }

    /// Sets the scan API to submit to and poll.
    pub fn with_api<A: ScanApi + 'static>(mut self, api: A) -> Self {
        self.api = Some(Arc::new(api));
        self
    }

    /// Sets a scan API already wrapped in an Arc.
    pub fn with_arc_api(mut self, api: ArcScanApi) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the domain source.
    pub fn with_source<S: DomainSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets the directory results are persisted under.
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = Some(dir.into());
        self
    }

    /// Sets the scan profile for the run.
    pub fn with_scan_type(mut self, scan_type: ScanType) -> Self {
        self.scan_type = Some(scan_type);
        self
    }

    /// Restricts the run to one named list. May be called repeatedly.
    pub fn with_list(mut self, list: impl Into<ListName>) -> Self {
        self.lists.push(list.into());
        self
    }

    /// Restricts the run to the given named lists.
    pub fn with_lists<I>(mut self, lists: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ListName>,
    {
        self.lists.extend(lists.into_iter().map(Into::into));
        self
    }

    /// Rescans lists even when a completed result already exists.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets the polling configuration.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Sets the writer that receives newly issued scan ids, one per line.
    ///
    /// Defaults to standard error so ids stay separable from regular
    /// logging on standard output.
    pub fn with_scan_id_sink<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.scan_id_sink = Some(Box::new(sink));
        self
    }

    /// Builds the orchestrator.
    ///
    /// Validates the configuration and the requested list names before any
    /// remote interaction: an unknown list name aborts here, with nothing
    /// submitted. Opens the result store for the run's scan type.
    pub fn build(self) -> RunResult<ListOrchestrator> {
        let api = self
            .api
            .ok_or_else(|| RunError::configuration("A scan API is required"))?;
        let source = self
            .source
            .ok_or_else(|| RunError::configuration("A domain source is required"))?;
        let results_dir = self
            .results_dir
            .ok_or_else(|| RunError::configuration("A results directory is required"))?;
        let scan_type = self
            .scan_type
            .ok_or_else(|| RunError::configuration("A scan type is required"))?;

        let available: BTreeSet<ListName> = source.list_names().into_iter().collect();

        let lists: Vec<ListName> = if self.lists.is_empty() {
            available.into_iter().collect()
        } else {
            let requested: BTreeSet<ListName> = self.lists.into_iter().collect();
            for list in &requested {
                if !available.contains(list) {
                    return Err(RunError::UnknownList { list: list.clone() });
                }
            }
            requested.into_iter().collect()
        };

        if lists.is_empty() {
            return Err(RunError::EmptySource);
        }

        let store = ResultStore::open(&results_dir, scan_type).map_err(|error| {
            RunError::configuration(format!(
                "cannot open result store at {}: {error}",
                results_dir.display()
            ))
        })?;

        Ok(ListOrchestrator {
            api,
            source,
            store,
            scan_type,
            lists,
            overwrite: self.overwrite,
            poll: self.poll,
            scan_id_sink: self
                .scan_id_sink
                .unwrap_or_else(|| Box::new(io::stderr())),
            run_id: Uuid::new_v4(),
        })
    }
}

impl Default for ListOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a batch of domain lists through the scanning service.
///
/// For each requested list, in lexicographic order, the orchestrator decides
/// between three courses based on the result store:
///
/// - a completed result already exists and overwrite is off: **skip**;
/// - a submission record exists without a result: **resume** polling the
///   stored scan id, falling back to one fresh submission if the service no
///   longer knows the id;
/// - otherwise: **fresh start**, submitting the list's domains as a new scan.
///
/// Lists are processed strictly sequentially and the first failure aborts
/// the run. Results saved before the failure stay on disk, so rerunning the
/// same command picks up where the failed run stopped.
pub struct ListOrchestrator {
    api: ArcScanApi,
    source: Box<dyn DomainSource>,
    store: ResultStore,
    scan_type: ScanType,
    lists: Vec<ListName>,
    overwrite: bool,
    poll: PollConfig,
    scan_id_sink: Box<dyn Write + Send>,
    run_id: Uuid,
}

impl ListOrchestrator {
    /// Creates a new builder.
    pub fn builder() -> ListOrchestratorBuilder {
        ListOrchestratorBuilder::new()
    }

    /// Returns the identifier of this run.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the lists this run will process, in processing order.
    pub fn lists(&self) -> &[ListName] {
        &self.lists
    }

    /// Processes all requested lists and returns the run's outcome counts.
    pub async fn run(mut self) -> RunResult<RunSummary> {
        audit::emit_run_started(self.run_id, self.scan_type, &self.lists, self.overwrite);

        let mut summary = RunSummary::new(self.run_id, self.scan_type);
        let lists = std::mem::take(&mut self.lists);

        for list in &lists {
            self.process_list(list, &mut summary).await?;
        }

        audit::emit_run_finished(&summary);
        Ok(summary)
    }

    async fn process_list(&mut self, list: &ListName, summary: &mut RunSummary) -> RunResult<()> {
        let record = self
            .store
            .list_record(list)
            .map_err(|source| RunError::store(list.clone(), self.scan_type, source))?;

        let resumable = match record {
            Some(record) if record.completed && !self.overwrite => {
                audit::emit_list_skipped(self.run_id, list, &record.scan_id);
                summary.skipped += 1;
                return Ok(());
            }
            Some(record) if !self.overwrite => Some(record),
            _ => None,
        };

        match resumable {
            Some(record) => {
                audit::emit_scan_resumed(self.run_id, list, self.scan_type, &record.scan_id);

                let domains = self.domains_for(list)?;
                let session =
                    ScanSession::resume(self.api.clone(), record.scan_id.as_str(), self.poll.clone());

                match self.wait_and_save(list, session, domains).await {
                    Ok(()) => summary.resumed += 1,
                    Err(RunError::Scan { source, .. }) if source.is_not_found() => {
                        // The stored scan is gone. Replace it with a single
                        // fresh submission; a second loss is a hard failure.
                        audit::emit_scan_lost(self.run_id, list, &record.scan_id);
                        self.run_fresh(list).await?;
                        summary.resubmitted += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
            None => self.run_fresh(list).await?,
        }

        summary.completed += 1;
        Ok(())
    }

    /// Submits the list as a new scan, then waits for and persists its result.
    async fn run_fresh(&mut self, list: &ListName) -> RunResult<()> {
        let domains = self.domains_for(list)?;

        let session = ScanSession::submit(
            self.api.clone(),
            list,
            &domains,
            self.scan_type,
            self.poll.clone(),
        )
        .await
        .map_err(|source| RunError::scan(list.clone(), self.scan_type, ScanPhase::Submit, source))?;

        audit::emit_scan_submitted(
            self.run_id,
            list,
            self.scan_type,
            session.scan_id(),
            domains.len(),
        );
        self.write_scan_id(session.scan_id());

        // Persisted before the first poll, so a crash while waiting still
        // leaves the id on disk for the next run to resume.
        self.store
            .record_submission(list, session.scan_id())
            .map_err(|source| RunError::store(list.clone(), self.scan_type, source))?;

        self.wait_and_save(list, session, domains).await
    }

    async fn wait_and_save(
        &mut self,
        list: &ListName,
        session: ScanSession,
        domains: Vec<String>,
    ) -> RunResult<()> {
        let report = session
            .wait_for_report()
            .await
            .map_err(|source| RunError::scan(list.clone(), self.scan_type, ScanPhase::Poll, source))?;

        let result = ListResult::new(
            list.clone(),
            self.scan_type,
            session.scan_id(),
            domains,
            report,
        );

        self.store
            .save_result(&result)
            .map_err(|source| RunError::store(list.clone(), self.scan_type, source))?;

        audit::emit_result_saved(
            self.run_id,
            list,
            self.scan_type,
            &result.scan_id,
            result.domain_count(),
        );
        Ok(())
    }

    fn domains_for(&self, list: &ListName) -> RunResult<Vec<String>> {
        Ok(self.source.domains(list, self.scan_type)?)
    }

    /// Writes a newly issued scan id to the scan-id channel, best effort.
    fn write_scan_id(&mut self, scan_id: &str) {
        let outcome = writeln!(self.scan_id_sink, "{scan_id}")
            .and_then(|()| self.scan_id_sink.flush());
        if let Err(error) = outcome {
            tracing::warn!(
                scan_id = %scan_id,
                %error,
                "Could not write scan id to the scan-id channel"
            );
        }
    }
}

impl std::fmt::Debug for ListOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListOrchestrator")
            .field("run_id", &self.run_id)
            .field("scan_type", &self.scan_type)
            .field("lists", &self.lists)
            .field("overwrite", &self.overwrite)
            .finish()
    }
}
