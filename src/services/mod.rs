pub mod codec;
pub mod debouncer;
pub mod file_watcher;
pub mod session;

pub use codec::ImageFormat;
pub use debouncer::Debouncer;
pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use session::{ExportPhase, Presentation, PreviewSession};
