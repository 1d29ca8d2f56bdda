//! Scan pipeline.
//!
//! Walks a subtree under the document lock, extracts and admits candidates,
//! and dispatches conversions as tasks. Completed conversions are annotated
//! after a short delay and recorded once their marker is placed.

use std::sync::Arc;

use fxlens_protocols::{
    ConversionRecord, CurrencyConverter, MatchCandidate, Settings, SettingsPatch,
};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::annotate::{
    self, attached_markers, holds_marker, is_excluded_tag, is_marker, marker_text, Anchor,
    Annotator, InsertOutcome,
};
use crate::context::ConverterContext;
use crate::document::{Document, NodeId, SharedDocument};
use crate::error::CoreError;
use crate::extractor::Extractor;
use crate::tracker::{QueuedConversion, StateTracker};

/// Counts from one scan pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Non-blank text segments visited.
    pub segments: usize,
    /// Candidates admitted by the tracker.
    pub admitted: usize,
    /// Conversions started right away.
    pub dispatched: usize,
    /// Conversions held until the page settles.
    pub queued: usize,
}

/// Drives extraction, conversion and annotation for one document.
pub struct Scanner {
    ctx: Arc<ConverterContext>,
    document: SharedDocument,
    converter: Arc<dyn CurrencyConverter>,
    extractor: Extractor,
    annotator: Annotator,
    tasks: TaskTracker,
}

impl Scanner {
    pub fn new(
        ctx: Arc<ConverterContext>,
        document: SharedDocument,
        converter: Arc<dyn CurrencyConverter>,
    ) -> Result<Self, CoreError> {
        let annotator = Annotator::from_config(ctx.config());
        Ok(Self {
            ctx,
            document,
            converter,
            extractor: Extractor::new()?,
            annotator,
            tasks: TaskTracker::new(),
        })
    }

    pub fn context(&self) -> &Arc<ConverterContext> {
        &self.ctx
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// Conversions currently running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every dispatched conversion has finished.
    pub async fn wait_idle(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    // ---- scanning ----

    /// Full pass over the document. Skipped while disabled or while another
    /// full pass holds the scan flag.
    pub fn scan_document(&self) -> ScanReport {
        if !self.ctx.is_enabled() {
            return ScanReport::default();
        }
        let Some(_guard) = self.ctx.begin_scan() else {
            debug!("Full scan already in progress");
            return ScanReport::default();
        };

        let root = self.document.read(|doc| doc.root());
        let report = self.scan_subtree(root);
        info!(
            "Scanned {} segments: {} admitted, {} dispatched, {} queued",
            report.segments, report.admitted, report.dispatched, report.queued
        );
        report
    }

    /// Scan one node: a text node itself, or every text node beneath an
    /// element.
    pub fn scan_node(&self, node: NodeId) -> ScanReport {
        if !self.ctx.is_enabled() {
            return ScanReport::default();
        }
        self.scan_subtree(node)
    }

    fn scan_subtree(&self, node: NodeId) -> ScanReport {
        let target = self.ctx.target_currency();
        let min_len = self.ctx.config().min_text_len;
        let mut report = ScanReport::default();

        let (ready, epoch) = self.document.read(|doc| {
            let mut state = self.ctx.state();
            let mut ready = Vec::new();

            for text_node in collect_text_nodes(doc, node) {
                report.segments += 1;
                for (anchor, candidate) in
                    self.process_text_node(doc, &mut state, text_node, &target, min_len)
                {
                    report.admitted += 1;
                    if state.is_settled() {
                        ready.push((anchor, candidate));
                    } else {
                        debug!("Queued {} until the page settles", candidate.raw_match_text);
                        state.enqueue(QueuedConversion { anchor, candidate });
                        report.queued += 1;
                    }
                }
            }
            (ready, state.epoch())
        });

        report.dispatched = ready.len();
        for (anchor, candidate) in ready {
            self.dispatch(anchor, candidate, epoch);
        }
        report
    }

    fn process_text_node(
        &self,
        doc: &Document,
        state: &mut StateTracker,
        node: NodeId,
        target: &str,
        min_len: usize,
    ) -> Vec<(Anchor, MatchCandidate)> {
        let Some(parent) = doc.parent(node) else {
            return Vec::new();
        };
        // already annotated, split wrappers included
        if holds_marker(doc, parent) {
            return Vec::new();
        }
        let Some(text) = doc.text(node) else {
            return Vec::new();
        };
        if text.trim().chars().count() < min_len || state.is_segment_processed(node, text) {
            return Vec::new();
        }

        let anchor = Anchor {
            node,
            parent: Some(parent),
        };
        let admitted: Vec<_> = self
            .extractor
            .extract(text, target)
            .into_iter()
            .filter(|candidate| state.admit(candidate))
            .map(|candidate| (anchor, candidate))
            .collect();

        if !admitted.is_empty() {
            debug!("Found {} currency matches in {}", admitted.len(), node);
        }
        state.mark_segment_processed(node, text, !admitted.is_empty());
        admitted
    }

    fn dispatch(&self, anchor: Anchor, candidate: MatchCandidate, epoch: u64) {
        let job = ConversionJob {
            ctx: Arc::clone(&self.ctx),
            document: self.document.clone(),
            converter: Arc::clone(&self.converter),
            annotator: self.annotator.clone(),
            settings: self.ctx.settings(),
            anchor,
            candidate,
            epoch,
        };
        self.tasks.spawn(job.run());
    }

    // ---- settlement ----

    /// Mark the page settled and dispatch queued conversions whose anchors
    /// are still attached. Keys of dropped entries are released.
    pub fn settle(&self) -> usize {
        let (ready, epoch) = self.document.read(|doc| {
            let mut state = self.ctx.state();
            let mut ready = Vec::new();
            for queued in state.settle() {
                if doc.is_attached(queued.anchor.node) {
                    ready.push(queued);
                } else {
                    state.release(&queued.candidate.dedup_key);
                }
            }
            (ready, state.epoch())
        });

        let count = ready.len();
        for queued in ready {
            self.dispatch(queued.anchor, queued.candidate, epoch);
        }
        info!("Page settled, dispatched {} queued conversions", count);
        count
    }

    // ---- lifecycle ----

    /// Remove every marker and clear records. Returns markers removed.
    pub fn revert_all(&self) -> usize {
        let removed = self.document.with(|doc| {
            let removed = annotate::revert_all(doc);
            self.ctx.state().clear_conversions();
            removed
        });
        self.ctx.publish_badge(0);
        info!("Removed {} conversions", removed);
        removed
    }

    /// Forget pending keys, processed segments and queued conversions.
    pub fn reset(&self) {
        self.ctx.state().reset();
    }

    /// Revert, reset and scan again.
    pub fn rescan(&self) -> ScanReport {
        if !self.ctx.is_enabled() {
            return ScanReport::default();
        }
        self.revert_all();
        self.reset();
        self.scan_document()
    }

    /// Enable scanning (with a full pass) or disable it (reverting markers).
    pub fn set_enabled(&self, enabled: bool) {
        self.ctx.set_enabled(enabled);
        if enabled {
            self.scan_document();
        } else {
            self.revert_all();
            self.reset();
        }
    }

    /// Merge a settings update; a new target currency triggers a rescan.
    /// Returns whether the target changed.
    pub fn apply_settings(&self, patch: SettingsPatch) -> bool {
        let changed = self.ctx.update_settings(patch);
        if changed && self.ctx.is_enabled() {
            self.rescan();
        }
        changed
    }

    /// Lower the total when markers were removed from the page.
    pub fn reconcile(&self) -> Option<u64> {
        let lowered = self.document.read(|doc| {
            let attached = attached_markers(doc).len() as u64;
            self.ctx.state().reconcile(attached)
        });
        if let Some(count) = lowered {
            debug!("Reconciled total down to {}", count);
            self.ctx.publish_badge(count);
        }
        lowered
    }
}

/// Non-blank text nodes under `node`, skipping markers and excluded tags.
fn collect_text_nodes(doc: &Document, node: NodeId) -> Vec<NodeId> {
    let mut found = Vec::new();
    if !doc.is_attached(node) || doc.ancestors(node).any(|a| is_marker(doc, a)) {
        return found;
    }

    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        if let Some(text) = doc.text(id) {
            if !text.trim().is_empty() {
                found.push(id);
            }
            continue;
        }
        if is_marker(doc, id) || doc.tag(id).is_some_and(is_excluded_tag) {
            continue;
        }
        stack.extend(doc.children(id).iter().rev().copied());
    }
    found
}

/// One conversion from dispatch to annotation.
struct ConversionJob {
    ctx: Arc<ConverterContext>,
    document: SharedDocument,
    converter: Arc<dyn CurrencyConverter>,
    annotator: Annotator,
    settings: Settings,
    anchor: Anchor,
    candidate: MatchCandidate,
    epoch: u64,
}

impl ConversionJob {
    async fn run(self) {
        let candidate = &self.candidate;
        let target = self.settings.target_currency.clone();
        debug!(
            "Converting {} {} to {}",
            candidate.numeric_amount, candidate.currency_code, target
        );

        let result = self
            .converter
            .convert(
                candidate.numeric_amount,
                &candidate.currency_code,
                &target,
                &self.settings,
            )
            .await;

        {
            let mut state = self.ctx.state();
            if state.epoch() != self.epoch || !state.release(&candidate.dedup_key) {
                debug!("Discarding response for {}: pass was reset", candidate.dedup_key);
                return;
            }
        }

        let converted = match result {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Conversion failed for {} {}: {}",
                    candidate.numeric_amount, candidate.currency_code, e
                );
                return;
            }
        };
        if !self.ctx.is_enabled() {
            debug!("Discarding response for {}: disabled", candidate.dedup_key);
            return;
        }

        tokio::time::sleep(self.ctx.config().insert_delay()).await;

        let text = marker_text(&target, converted);
        let outcome = self.document.with(|doc| {
            let mut state = self.ctx.state();
            if state.epoch() != self.epoch || !self.ctx.is_enabled() {
                return None;
            }
            let outcome = self
                .annotator
                .insert(doc, state.ledger_mut(), self.anchor, candidate, &text);
            // only a placed marker counts towards the total
            let total = match &outcome {
                Ok(InsertOutcome::Inserted { .. }) => Some(state.record(ConversionRecord::new(
                    candidate.currency_code.clone(),
                    candidate.numeric_amount,
                    converted,
                    target.clone(),
                    candidate.raw_match_text.clone(),
                ))),
                _ => None,
            };
            Some((outcome, total))
        });

        let Some((outcome, total)) = outcome else {
            debug!("Insertion skipped for {}: pass was reset", candidate.raw_match_text);
            return;
        };
        if let Some(total) = total {
            self.ctx.publish_badge(total);
        }

        match outcome {
            Ok(InsertOutcome::Inserted {
                strategy,
                relocated,
                ..
            }) => info!(
                "Converted {} {} to {:.2} {} via {} (relocated: {})",
                candidate.numeric_amount,
                candidate.currency_code,
                converted,
                target,
                strategy.name(),
                relocated
            ),
            Ok(InsertOutcome::AlreadyAnnotated) => {
                debug!("{} already carries a marker", candidate.raw_match_text)
            }
            Err(e) => debug!("Insertion dropped: {}", e),
        }
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
