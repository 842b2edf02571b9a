/// Quantity at or below which a holding is clamped to exactly zero
/// after a reduction, to avoid negative-dust division artifacts.
pub const QUANTITY_EPSILON: &str = "0.00000001";

/// Holdings with a quantity at or below this are dropped from snapshot output.
pub const DUST_THRESHOLD: &str = "0.000001";

/// Minimum invested capital for a meaningful P&L percentage.
pub const MIN_INVESTED_FOR_PNL: &str = "0.01";
