mod central_panel;
mod control_panel;

pub use central_panel::CanvasOverlay;
pub use control_panel::{ControlPanel, PanelState};
