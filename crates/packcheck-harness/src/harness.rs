//! Round-trip stress harness.

use crate::guard::guarded;
use crate::options::HarnessOptions;
use packcheck_core::capabilities::{
    without_baseline_theme, DeltaEngine, DocumentModel, MergeEngine, TypedDelta,
};
use packcheck_core::compare::{compare_archives, ComparisonResult};
use packcheck_core::errors::{io_error, Result};
use packcheck_core::{log_op_end, log_op_start};
use packcheck_core_types::RunContext;
use std::path::Path;
use std::time::Instant;
use tempfile::TempDir;

/// Pipeline stage named in failure logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    SaveArchive,
    RoundTrip,
    SaveEditableTree,
    CloneIdempotence,
    SelfDiffIdempotence,
    MergeIdempotence,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Load => "load",
            Stage::SaveArchive => "save_archive",
            Stage::RoundTrip => "round_trip",
            Stage::SaveEditableTree => "save_editable_tree",
            Stage::CloneIdempotence => "clone_idempotence",
            Stage::SelfDiffIdempotence => "self_diff_idempotence",
            Stage::MergeIdempotence => "merge_idempotence",
        }
    }
}

fn stage_failed(run_id: &str, stage: Stage, detail: &str) -> bool {
    tracing::error!(run_id, stage = stage.as_str(), "{detail}");
    false
}

/// Tag a stage fault in the log before it propagates
fn at<T>(run_id: &str, stage: Stage, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::error!(run_id, stage = stage.as_str(), error = %e, "stage fault");
    }
    result
}

fn scratch_dir() -> Result<TempDir> {
    TempDir::new().map_err(|e| io_error("create_scratch_dir", e))
}

/// Drives a document model and its engines through save, load, clone, diff
/// and merge cycles and checks each one against the comparator.
///
/// All scratch archives and trees live in temporary directories that are
/// removed when the check returns, whatever its outcome.
pub struct RoundTripStressHarness<M, D, G> {
    model: M,
    delta: D,
    merge: G,
    options: HarnessOptions,
}

impl<M, D, G> RoundTripStressHarness<M, D, G>
where
    M: DocumentModel,
    D: DeltaEngine<Document = M::Document>,
    G: MergeEngine<Document = M::Document>,
{
    pub fn new(model: M, delta: D, merge: G, options: HarnessOptions) -> Self {
        Self {
            model,
            delta,
            merge,
            options,
        }
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    /// Save both documents to scratch archives and compare them.
    ///
    /// # Errors
    ///
    /// Returns an error if either save fails or an archive cannot be read back.
    pub fn compare_documents(
        &self,
        a: &M::Document,
        b: &M::Document,
    ) -> Result<ComparisonResult> {
        let dir = scratch_dir()?;
        let path_a = dir.path().join("a.pack");
        let path_b = dir.path().join("b.pack");

        self.model.save_to_archive(a, &path_a)?;
        self.model.save_to_archive(b, &path_b)?;
        let result = compare_archives(&path_a, &path_b, &self.options.compare)?;

        if let Some(fault) = &result.fault {
            tracing::error!(
                entry = %fault.entry,
                reason = %fault.reason,
                "non-text entry mismatch"
            );
        }
        Ok(result)
    }

    /// Whether two documents save to archives that compare identical
    ///
    /// # Errors
    ///
    /// See [`Self::compare_documents`].
    pub fn documents_equal(&self, a: &M::Document, b: &M::Document) -> Result<bool> {
        Ok(self.compare_documents(a, b)?.is_identical())
    }

    /// Save one document twice independently; both archives must compare
    /// identical.
    ///
    /// # Errors
    ///
    /// See [`Self::compare_documents`].
    pub fn save_compare(&self, document: &M::Document) -> Result<bool> {
        self.documents_equal(document, document)
    }

    /// Clone through the model and check the clone carries no structural
    /// delta and saves identically.
    ///
    /// Unless `strict`, entropy is stripped from both sides before the
    /// archive comparison.
    ///
    /// # Errors
    ///
    /// Returns an error if any save, load or comparison fails.
    pub fn test_clone(&self, document: &M::Document, strict: bool) -> Result<bool> {
        let clone = self.model.clone_document(document);
        let leftovers = self.real_delta(document, &clone);
        if !leftovers.is_empty() {
            for delta in &leftovers {
                tracing::warn!(delta = ?delta, "clone differs from its source");
            }
            return Ok(false);
        }
        if strict {
            return self.documents_equal(document, &clone);
        }
        let original = self.remove_entropy(document)?;
        let clone = self.remove_entropy(&clone)?;
        self.documents_equal(&original, &clone)
    }

    /// A document diffed against itself yields nothing beyond baseline-theme
    /// markers
    pub fn diff_stress_test(&self, document: &M::Document) -> bool {
        let leftovers = without_baseline_theme(self.delta.compute_delta(document, document));
        for delta in &leftovers {
            tracing::warn!(delta = ?delta, "self-diff produced a delta");
        }
        leftovers.is_empty()
    }

    /// Merging with the ancestor equal to `theirs` must give back `ours`.
    ///
    /// Checked as `merge(base = d2, ours = d1, theirs = d2) == d1` and the
    /// symmetric `merge(base = d1, ours = d2, theirs = d1) == d2`, where
    /// equality means an empty delta.
    ///
    /// # Errors
    ///
    /// Returns an error if the merge engine fails.
    pub fn merge_stress_test(&self, d1: &M::Document, d2: &M::Document) -> Result<bool> {
        let forward = self.merge.merge(d2, d1, d2)?;
        let forward_delta = self.real_delta(d1, &forward);

        let backward = self.merge.merge(d1, d2, d1)?;
        let backward_delta = self.real_delta(d2, &backward);

        for delta in forward_delta.iter().chain(&backward_delta) {
            tracing::warn!(delta = ?delta, "merge was not a no-op");
        }
        Ok(forward_delta.is_empty() && backward_delta.is_empty())
    }

    fn real_delta(&self, a: &M::Document, b: &M::Document) -> Vec<TypedDelta> {
        without_baseline_theme(self.delta.compute_delta(a, b))
    }

    /// Strip entropy by saving to an editable tree, deleting the entropy
    /// subtree and loading the tree back
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be written, cleaned or reloaded.
    pub fn remove_entropy(&self, document: &M::Document) -> Result<M::Document> {
        let dir = scratch_dir()?;
        let tree = dir.path().join("src");

        self.model.save_to_editable_tree(document, &tree)?;
        let entropy = tree.join(self.model.entropy_dir_name());
        if entropy.exists() {
            std::fs::remove_dir_all(&entropy).map_err(|e| io_error("remove_entropy", e))?;
        }
        Ok(self.model.load_from_editable_tree(&tree)?.document)
    }

    /// Full pipeline on one archive: load, save, round-trip comparison,
    /// editable-tree save, clone idempotence and self-diff idempotence.
    ///
    /// Never fails or panics; every fault is logged and reported as `false`.
    pub fn stress_test(&self, path: &Path) -> bool {
        let ctx = RunContext::new().with_subject(path.display().to_string());
        let run_id = ctx.run_id.as_str();
        log_op_start!("stress_test", run_id = run_id, archive = %path.display());
        let start = Instant::now();

        let passed = guarded("stress_test", run_id, || self.run_pipeline(path, run_id));

        log_op_end!(
            "stress_test",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id,
            passed = passed
        );
        passed
    }

    fn run_pipeline(&self, path: &Path, run_id: &str) -> Result<bool> {
        let loaded = at(run_id, Stage::Load, self.model.load_from_archive(path))?;
        if !loaded.warnings.is_empty() {
            tracing::info!(
                run_id,
                stage = Stage::Load.as_str(),
                warning_count = loaded.warnings.len(),
                "load warnings tolerated"
            );
        }
        let document = loaded.document;

        let dir = scratch_dir()?;
        let resaved = dir.path().join("resaved.pack");
        at(
            run_id,
            Stage::SaveArchive,
            self.model.save_to_archive(&document, &resaved),
        )?;

        let round_trip = at(
            run_id,
            Stage::RoundTrip,
            compare_archives(path, &resaved, &self.options.compare),
        )?;
        if !round_trip.is_identical() {
            for diagnostic in &round_trip.diagnostics {
                tracing::error!(run_id, stage = Stage::RoundTrip.as_str(), "{diagnostic}");
            }
            return Ok(stage_failed(run_id, Stage::RoundTrip, "re-saved archive differs"));
        }

        at(
            run_id,
            Stage::SaveEditableTree,
            self.model
                .save_to_editable_tree(&document, &dir.path().join("src")),
        )?;

        let clone_ok = at(
            run_id,
            Stage::CloneIdempotence,
            self.test_clone(&document, self.options.strict_clone),
        )?;
        if !clone_ok {
            return Ok(stage_failed(
                run_id,
                Stage::CloneIdempotence,
                "clone does not save identically",
            ));
        }

        if !self.diff_stress_test(&document) {
            return Ok(stage_failed(
                run_id,
                Stage::SelfDiffIdempotence,
                "self-diff is not empty",
            ));
        }

        Ok(true)
    }

    /// Load two archives and run [`Self::merge_stress_test`] on them
    pub fn merge_stress(&self, path_a: &Path, path_b: &Path) -> bool {
        let ctx = RunContext::new();
        let run_id = ctx.run_id.as_str();
        log_op_start!(
            "merge_stress",
            run_id = run_id,
            archive_a = %path_a.display(),
            archive_b = %path_b.display()
        );
        let start = Instant::now();

        let passed = guarded("merge_stress", run_id, || {
            let d1 = self.model.load_from_archive(path_a)?.document;
            let d2 = self.model.load_from_archive(path_b)?.document;
            let ok = at(run_id, Stage::MergeIdempotence, self.merge_stress_test(&d1, &d2))?;
            if !ok {
                stage_failed(run_id, Stage::MergeIdempotence, "merge was not a no-op");
            }
            Ok(ok)
        });

        log_op_end!(
            "merge_stress",
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = run_id,
            passed = passed
        );
        passed
    }
}
