//! Map-based visualizer for heterogeneous directory search results.
//!
//! Resolves shops, services, users and products to map positions, derives
//! the camera, animates the proximity ring around the viewer and builds the
//! per-category detail panels. Rendering itself is delegated to a
//! [`MapSurface`] implementation supplied by the host.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod navigation;
pub mod presentation;
pub mod pulse;
pub mod resolver;
pub mod surface;
pub mod viewport;
pub mod visualizer;

pub use aggregate::{aggregate, Marker, MarkerCache};
pub use error::MapError;
pub use filter::MarkerFilter;
pub use navigation::{DetailRoute, Navigator};
pub use presentation::{present, DetailPanel, IconCache, MarkerIcon, MarkerPresentation};
pub use pulse::{proximity_overlay, ProximityOverlay, PulseAnimator, PulsePhase, RingLevel};
pub use resolver::resolve;
pub use surface::{Chrome, MapSurface, MarkerView, SurfaceLifecycle, UserMarker};
pub use viewport::{compute_viewport, Viewport, ViewportFocus};
pub use visualizer::MapVisualizer;
