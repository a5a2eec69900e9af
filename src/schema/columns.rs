/// Column names as constants for type safety
/// Row identifier synthesized as 1..N when absent (bookkeeping only, never serialized)
pub const ID: &str = "id";
/// Opaque per-point bytes that are intentionally not described by an extra-bytes record
pub const UNDOCUMENTED_BYTES: &str = "undocumented_bytes";

// Core coordinates (scaled, real-world units)
/// X coordinate
pub const X: &str = "x";
/// Y coordinate
pub const Y: &str = "y";
/// Z coordinate
pub const Z: &str = "z";
/// Pulse return magnitude
pub const INTENSITY: &str = "intensity";
/// Pulse return number for a given output pulse
pub const RETURN_NUMBER: &str = "return_number";
/// Total number of returns for a given pulse
pub const NUMBER_OF_RETURNS: &str = "number_of_returns";
/// Direction of the scan mirror at the time of the pulse
pub const SCAN_DIRECTION: &str = "scan_direction";
/// Set on the last point of a scan line before the direction changes
pub const EDGE_OF_FLIGHT_LINE: &str = "edge_of_flight_line";
/// ASPRS classification code
pub const CLASSIFICATION: &str = "classification";
/// Point created by a technique other than LiDAR collection
pub const SYNTHETIC: &str = "synthetic";
/// Model key-point flag
pub const KEY_POINT: &str = "key_point";
/// Withheld (deleted) flag
pub const WITHHELD: &str = "withheld";
/// Overlap flag (point formats 6-10)
pub const OVERLAP: &str = "overlap";
/// Scanner channel for multi-channel systems (point formats 6-10)
pub const SCANNER_CHANNEL: &str = "scanner_channel";
/// Scan angle (rank in formats 0-5, 0.006 degree increments in 6-10)
pub const SCAN_ANGLE: &str = "scan_angle";
/// Free-form per-point user byte
pub const USER_DATA: &str = "user_data";
/// File source ID the point originated from
pub const POINT_SOURCE_ID: &str = "point_source_id";
/// GPS time of the point
pub const GPS_TIME: &str = "gps_time";

// Colour channels
/// Red image channel
pub const RED: &str = "red";
/// Green image channel
pub const GREEN: &str = "green";
/// Blue image channel
pub const BLUE: &str = "blue";
/// Near-infrared channel
pub const NIR: &str = "nir";

// Waveform packet columns
/// Index into the waveform packet descriptor records
pub const WAVE_PACKET_DESCRIPTOR_INDEX: &str = "wave_packet_descriptor_index";
/// Byte offset to the waveform data
pub const WAVE_DATA_OFFSET: &str = "wave_data_offset";
/// Size in bytes of the waveform packet
pub const WAVE_PACKET_SIZE: &str = "wave_packet_size";
/// Offset in picoseconds from the first digitized value to the return
pub const RETURN_POINT_LOCATION: &str = "return_point_location";
/// Parametric line X component
pub const WAVE_DX: &str = "wave_dx";
/// Parametric line Y component
pub const WAVE_DY: &str = "wave_dy";
/// Parametric line Z component
pub const WAVE_DZ: &str = "wave_dz";
