//! Asset loader gate.
//!
//! Load operations register a ticket, settle it with their outcome, and the
//! gate resolves exactly once after it is sealed and nothing is outstanding.
//! Failures are recorded but never hold the gate shut. Consumers await a
//! [`ReadySignal`]; dropping one only drops that subscription.

use crate::error::LoadError;
use fnv::FnvHashMap;
use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Outcome of one settled load operation.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadOutcome {
    pub label: String,
    pub error: Option<LoadError>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub outcomes: Vec<LoadOutcome>,
}

impl LoadReport {
    pub fn failures(&self) -> impl Iterator<Item = (&str, &LoadError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| (o.label.as_str(), e)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

/// Running byte count of one download. Reports a percentage each time the
/// download crosses a new tenth of the announced size.
#[derive(Clone, Debug, Default)]
pub struct DownloadProgress {
    total: Option<u64>,
    loaded: u64,
    last_step: Option<u64>,
}

impl DownloadProgress {
    /// `total` is the announced `Content-Length`, if any.
    pub fn new(total: Option<u64>) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            loaded: 0,
            last_step: None,
        }
    }

    pub fn advance(&mut self, chunk_len: u64) -> Option<u64> {
        self.loaded += chunk_len;
        let total = self.total?;
        let percent = (self.loaded.saturating_mul(100) / total).min(100);
        let step = percent / 10;
        if self.last_step == Some(step) {
            return None;
        }
        self.last_step = Some(step);
        Some(percent)
    }

    pub fn loaded(&self) -> u64 {
        self.loaded
    }
}

/// Handle for one outstanding operation; consumed by `settle`.
#[derive(Debug)]
pub struct AssetTicket {
    id: u64,
}

struct GateInner {
    outstanding: FnvHashMap<u64, String>,
    next_id: u64,
    sealed: bool,
    resolved: bool,
    report: LoadReport,
    ready_tx: Option<oneshot::Sender<LoadReport>>,
}

impl GateInner {
    /// Takes the sender and the final report once the gate may open.
    fn try_resolve(&mut self) -> Option<(oneshot::Sender<LoadReport>, LoadReport)> {
        if self.resolved || !self.sealed || !self.outstanding.is_empty() {
            return None;
        }
        self.resolved = true;
        let report = std::mem::take(&mut self.report);
        log::info!(
            "[assets] ready ({} operations, {} failed)",
            report.outcomes.len(),
            report.failure_count()
        );
        self.ready_tx.take().map(|tx| (tx, report))
    }
}

fn resolve(ready: Option<(oneshot::Sender<LoadReport>, LoadReport)>) {
    if let Some((tx, report)) = ready {
        // every subscriber may already be gone
        _ = tx.send(report);
    }
}

#[derive(Clone)]
pub struct AssetGate {
    inner: Rc<RefCell<GateInner>>,
    ready_rx: Shared<oneshot::Receiver<LoadReport>>,
}

impl Default for AssetGate {
    fn default() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            inner: Rc::new(RefCell::new(GateInner {
                outstanding: FnvHashMap::default(),
                next_id: 0,
                sealed: false,
                resolved: false,
                report: LoadReport::default(),
                ready_tx: Some(tx),
            })),
            ready_rx: rx.shared(),
        }
    }
}

impl AssetGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, label: impl Into<String>) -> AssetTicket {
        let mut g = self.inner.borrow_mut();
        let id = g.next_id;
        g.next_id += 1;
        let label = label.into();
        if g.resolved {
            log::warn!("[assets] {} registered after the gate resolved; ignored", label);
        } else {
            g.outstanding.insert(id, label);
        }
        AssetTicket { id }
    }

    pub fn settle(&self, ticket: AssetTicket, outcome: Result<(), LoadError>) {
        let ready = {
            let mut g = self.inner.borrow_mut();
            let Some(label) = g.outstanding.remove(&ticket.id) else {
                return;
            };
            if let Err(e) = &outcome {
                log::error!("[assets] {} failed: {}", label, e);
            }
            g.report.outcomes.push(LoadOutcome {
                label,
                error: outcome.err(),
            });
            g.try_resolve()
        };
        resolve(ready);
    }

    /// No more operations will be registered.
    pub fn seal(&self) {
        let ready = {
            let mut g = self.inner.borrow_mut();
            g.sealed = true;
            g.try_resolve()
        };
        resolve(ready);
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.borrow().resolved
    }

    pub fn outstanding(&self) -> usize {
        self.inner.borrow().outstanding.len()
    }

    pub fn ready(&self) -> ReadySignal {
        ReadySignal {
            rx: self.ready_rx.clone(),
        }
    }
}

/// Resolves with the load report once the gate opens. Each signal is its
/// own subscription; dropping it unregisters its waker. A gate dropped
/// before it resolves leaves its signals pending.
pub struct ReadySignal {
    rx: Shared<oneshot::Receiver<LoadReport>>,
}

impl Future for ReadySignal {
    type Output = LoadReport;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<LoadReport> {
        match self.rx.poll_unpin(cx) {
            Poll::Ready(Ok(report)) => Poll::Ready(report),
            Poll::Ready(Err(oneshot::Canceled)) | Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn poll_once(signal: &mut ReadySignal, waker: &Waker) -> Poll<LoadReport> {
        let mut cx = Context::from_waker(waker);
        Pin::new(signal).poll(&mut cx)
    }

    #[test]
    fn resolves_once_after_all_tickets_settle() {
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(counter.clone());
        let gate = AssetGate::new();
        let model = gate.begin("model");
        let sprite = gate.begin("sprite");
        gate.seal();

        let mut signal = gate.ready();
        assert!(poll_once(&mut signal, &waker).is_pending());

        gate.settle(model, Ok(()));
        assert!(!gate.is_resolved());
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        gate.settle(
            sprite,
            Err(LoadError::Fetch {
                url: "images/indicator.png".into(),
                reason: "404".into(),
            }),
        );
        assert!(gate.is_resolved());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        match poll_once(&mut signal, &waker) {
            Poll::Ready(report) => {
                assert_eq!(report.outcomes.len(), 2);
                assert_eq!(report.failure_count(), 1);
                assert_eq!(report.failures().next().map(|(l, _)| l), Some("sprite"));
            }
            Poll::Pending => panic!("gate should be open"),
        }
    }

    #[test]
    fn dropped_signals_are_not_woken() {
        let gate = AssetGate::new();
        let model = gate.begin("model");
        gate.seal();

        let dropped = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let dropped_waker = Waker::from(dropped.clone());
        for _ in 0..1000 {
            let mut signal = gate.ready();
            assert!(poll_once(&mut signal, &dropped_waker).is_pending());
        }

        let live = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let live_waker = Waker::from(live.clone());
        let mut signal = gate.ready();
        assert!(poll_once(&mut signal, &live_waker).is_pending());

        gate.settle(model, Ok(()));
        assert_eq!(dropped.0.load(Ordering::SeqCst), 0);
        assert_eq!(live.0.load(Ordering::SeqCst), 1);
        assert!(poll_once(&mut signal, &live_waker).is_ready());
    }

    #[test]
    fn every_subscriber_gets_the_same_report() {
        let gate = AssetGate::new();
        let mut first = gate.ready();
        let mut second = gate.ready();
        let t = gate.begin("model");
        gate.seal();
        gate.settle(t, Err(LoadError::EmptyModel));

        let waker = Waker::from(Arc::new(CountingWaker(AtomicUsize::new(0))));
        let a = poll_once(&mut first, &waker);
        let b = poll_once(&mut second, &waker);
        match (a, b) {
            (Poll::Ready(a), Poll::Ready(b)) => {
                assert_eq!(a, b);
                assert_eq!(a.failure_count(), 1);
            }
            _ => panic!("both subscribers should see the report"),
        }
    }

    #[test]
    fn dropped_gate_leaves_signal_pending() {
        let gate = AssetGate::new();
        let mut signal = gate.ready();
        drop(gate);
        let waker = Waker::from(Arc::new(CountingWaker(AtomicUsize::new(0))));
        assert!(poll_once(&mut signal, &waker).is_pending());
    }

    #[test]
    fn progress_reports_each_tenth_once() {
        let mut p = DownloadProgress::new(Some(1000));
        assert_eq!(p.advance(50), Some(5));
        assert_eq!(p.advance(40), None);
        assert_eq!(p.advance(20), Some(11));
        assert_eq!(p.advance(600), Some(71));
        assert_eq!(p.advance(290), Some(100));
        assert_eq!(p.loaded(), 1000);
    }

    #[test]
    fn progress_without_length_only_counts() {
        let mut p = DownloadProgress::new(None);
        assert_eq!(p.advance(4096), None);
        let mut zero = DownloadProgress::new(Some(0));
        assert_eq!(zero.advance(10), None);
        assert_eq!(p.loaded(), 4096);
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        // Content-Length can undercount a re-encoded body
        let mut p = DownloadProgress::new(Some(100));
        assert_eq!(p.advance(250), Some(100));
        assert_eq!(p.advance(10), None);
    }

    #[test]
    fn unsealed_gate_stays_closed() {
        let gate = AssetGate::new();
        let t = gate.begin("model");
        gate.settle(t, Ok(()));
        assert!(!gate.is_resolved());
        gate.seal();
        assert!(gate.is_resolved());
    }

    #[test]
    fn empty_gate_resolves_on_seal() {
        let gate = AssetGate::new();
        gate.seal();
        assert!(gate.is_resolved());
        assert_eq!(gate.outstanding(), 0);
    }

    #[test]
    fn late_registration_is_ignored() {
        let gate = AssetGate::new();
        gate.seal();
        let late = gate.begin("late");
        assert_eq!(gate.outstanding(), 0);
        gate.settle(late, Err(LoadError::EmptyModel));
        let waker = Waker::from(Arc::new(CountingWaker(AtomicUsize::new(0))));
        match poll_once(&mut gate.ready(), &waker) {
            Poll::Ready(report) => assert!(report.outcomes.is_empty()),
            Poll::Pending => panic!("gate should be open"),
        }
    }
}
