#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
mod geometry;
pub mod history;
pub mod input;
pub mod palette;
pub mod panels;
pub mod pen;
pub mod persistence;
pub mod renderer;
mod restore;
pub mod snapshot;
pub mod state;
pub mod surface;
pub mod texture_manager;
pub mod util;

pub use app::DrawOverApp;
pub use color::{ColorParseError, HexColor};
pub use command::Command;
pub use config::DrawOverConfig;
pub use error::{ConfigError, DrawOverError, DrawOverResult};
pub use event::{EventBus, EventHandler, SubscriptionId};
pub use history::HistoryStack;
pub use input::{HostElement, InputEvent};
pub use palette::Palette;
pub use panels::{CanvasOverlay, ControlPanel};
pub use pen::{Pen, PenError, PenMode, PenSettings};
pub use persistence::PersistedDrawing;
pub use renderer::{Canvas, CompositeMode, RenderTarget, StrokeStyle};
pub use snapshot::{PngDecoder, Snapshot, SnapshotDecoder, SnapshotError};
pub use surface::DrawOver;
