/// Divisions per conference; each division sends its winner to the playoffs
pub const DIVISIONS_PER_CONFERENCE: usize = 4;

/// Playoff qualifiers per conference (division winners plus wild cards)
pub const PLAYOFF_TEAMS_PER_CONFERENCE: usize = 7;

/// Top seeds that skip the wild-card round
pub const BYE_SEEDS: usize = 1;

/// Wild-card ordering only consults common opponents when the tied group shares at least this many
pub const MIN_WILD_CARD_COMMON_OPPONENTS: usize = 4;

/// Wild-card round pairings (home seed, away seed) for the default league shape
pub const WILD_CARD_PAIRINGS: [(u8, u8); 3] = [(2, 7), (3, 6), (4, 5)];

/// Scale used to quantize tie-break metric values before comparing them
pub const METRIC_PRECISION: f64 = 1e9;

/// Quantize a metric value so equal fractions compare equal regardless of summation order.
pub fn quantize(value: f64) -> i64 {
    (value * METRIC_PRECISION).round() as i64
}
