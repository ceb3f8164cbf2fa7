//! Byte-level progress rendering with indicatif.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use lancrypt_core::TransferProgress;

/// Progress bar shown while streaming chunks.
///
/// The bar is created lazily when the transfer announces the file, because
/// the name and size are only known after the metadata frame.
pub struct BarProgress {
    verb: &'static str,
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new(verb: &'static str) -> Self {
        Self {
            verb,
            bar: Mutex::new(None),
        }
    }
}

impl TransferProgress for BarProgress {
    fn begin(&self, name: &str, total_bytes: u64) {
        let bar = ProgressBar::new(total_bytes);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:30.green}] {bytes}/{total_bytes} ({eta})")
                .unwrap()
                .progress_chars("=> "),
        );
        bar.set_message(format!("{} {}", self.verb, name));
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn advance(&self, bytes: u64) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(bytes);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish();
        }
    }
}
