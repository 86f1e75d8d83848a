use shared::Config;
use squeeze_core::data::{BarProvider, SymbolMaster};
use squeeze_core::scan::{ScanProgress, ScanReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// Claim on the single scan slot, released when dropped (including on panic)
pub struct ScanSlot {
    running: Arc<AtomicBool>,
}

impl ScanSlot {
    fn claim(running: &Arc<AtomicBool>) -> Option<Self> {
        running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                running: Arc::clone(running),
            })
    }
}

impl Drop for ScanSlot {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Shared handles for the HTTP handlers; at most one scan runs at a time
#[derive(Clone)]
pub struct ApiState {
    pub config: Config,
    pub provider: Arc<dyn BarProvider>,
    pub master: Arc<dyn SymbolMaster>,
    running: Arc<AtomicBool>,
    progress: Arc<RwLock<Option<watch::Receiver<ScanProgress>>>>,
    report: Arc<RwLock<Option<ScanReport>>>,
}

impl ApiState {
    pub fn new(config: Config, provider: Arc<dyn BarProvider>, master: Arc<dyn SymbolMaster>) -> Self {
        Self {
            config,
            provider,
            master,
            running: Arc::new(AtomicBool::new(false)),
            progress: Arc::new(RwLock::new(None)),
            report: Arc::new(RwLock::new(None)),
        }
    }

    /// Claim the scan slot; `None` if a scan is already running
    pub fn try_begin(&self) -> Option<ScanSlot> {
        ScanSlot::claim(&self.running)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn watch_progress(&self, rx: watch::Receiver<ScanProgress>) {
        *self.progress.write().await = Some(rx);
    }

    /// Latest progress snapshot of the current or last scan
    pub async fn progress(&self) -> Option<ScanProgress> {
        self.progress.read().await.as_ref().map(|rx| *rx.borrow())
    }

    pub async fn store_report(&self, report: ScanReport) {
        *self.report.write().await = Some(report);
    }

    pub async fn report(&self) -> Option<ScanReport> {
        self.report.read().await.clone()
    }
}
