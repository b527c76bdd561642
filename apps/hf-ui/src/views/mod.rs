pub mod control_view;
pub mod diagnostics_view;
pub mod monitor_view;

pub use control_view::{ControlActions, ControlView};
pub use diagnostics_view::DiagnosticsView;
pub use monitor_view::MonitorView;
