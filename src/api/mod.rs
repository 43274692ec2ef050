pub mod preview;

pub use preview::{__path_handle_export, __path_handle_params, __path_handle_preview};
pub use preview::{handle_export, handle_params, handle_preview, ExportQuery, PreviewQuery};
