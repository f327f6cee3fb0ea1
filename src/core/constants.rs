//! Engine-wide defaults for the measuring map.
//! Keeping them in a single place makes the magic numbers easy to audit.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Default view center as `[lon, lat]` (Melbourne, Australia).
pub const DEFAULT_CENTER_LON_LAT: [f64; 2] = [144.9631, -37.8136];

/// Default initial zoom level.
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Zoom limits of the OpenStreetMap tile set.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 19.0;

/// Default container height in CSS pixels.
pub const DEFAULT_CONTAINER_HEIGHT_PX: f32 = 500.0;

/// Width assumed for the container until the UI reports the real space.
pub const FALLBACK_CONTAINER_WIDTH_PX: f32 = 800.0;

/// Lengths strictly above this many meters are shown in kilometers.
pub const KILOMETER_THRESHOLD_M: f64 = 100.0;

/// Pixel offset of a live measure tooltip from its anchor.
pub const LIVE_TOOLTIP_OFFSET: [f32; 2] = [0.0, -15.0];

/// Pixel offset of a finalized tooltip, clear of the last vertex marker.
pub const STATIC_TOOLTIP_OFFSET: [f32; 2] = [0.0, -7.0];

/// Pixel distance within which a click on the last vertex finishes a sketch.
pub const DEFAULT_SNAP_TOLERANCE_PX: f64 = 12.0;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Wheel delta (in points) that corresponds to one zoom level.
pub const WHEEL_DELTA_PER_ZOOM: f64 = 120.0;
