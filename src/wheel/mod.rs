pub mod enablement;
pub mod item;
pub mod layout;
pub mod session;
pub mod spin;
pub mod view;

#[cfg(feature = "render")]
pub mod draw;

pub use enablement::EnablementMap;
pub use item::{Item, parse_items};
pub use layout::{SectorColor, SectorGeometry, WheelLayout};
pub use session::{Action, Effect, Session};
pub use spin::{Selection, Spin, SpinEngine, SpinPhase};
pub use view::{LegendRow, RenderModel};

pub const FULL_TURN: f64 = 360.0;
pub const FULL_REVOLUTIONS: u32 = 6; // extra turns before landing
pub const PALETTE_SIZE: usize = 4;
pub const DEFAULT_WHEEL_SIZE: f64 = 320.0;
pub const WHEEL_PADDING: f64 = 20.0; // gap between wheel rim and the drawing box
pub const ITEM_SIZE: f64 = 28.0; // label badge diameter
pub const EDGE_MARGIN: f64 = 2.0;
pub const MIN_LABEL_RADIUS: f64 = 24.0;
pub const POINTER_INSET: f64 = 8.0;
pub const MIN_POINTER_LENGTH: f64 = 24.0;
