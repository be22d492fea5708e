use std::fmt;

/// Widest raw integer a single sub-value may occupy, in bytes.
pub const MAX_BYTES_PER_VALUE: usize = 8;

/// How one logical sensor field is laid out in the payload.
///
/// A field spans `total_bytes` contiguous bytes split evenly into
/// `value_count` big-endian integers. Each integer is divided by
/// `scale_factor` and optionally rounded to `round_decimals` places.
///
/// Construct through [`FieldSchema::new`] (or [`FieldSchema::normalized`]);
/// both clamp malformed parameters instead of rejecting them.
///
/// # Examples
/// ```
/// use sensorport_core::FieldSchema;
///
/// let location = FieldSchema::new(8, 2, 10_000.0, true, None);
/// assert_eq!(location.bytes_per_value(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSchema {
    total_bytes: usize,
    value_count: usize,
    scale_factor: f64,
    signed: bool,
    round_decimals: Option<u32>,
}

/// A correction applied while building a [`FieldSchema`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaAdjustment {
    ZeroTotalBytes,
    ZeroValueCount,
    InvalidScaleFactor { given: f64 },
    NegativeRoundDecimals { given: i32 },
    UnevenSplit { total_bytes: usize, value_count: usize },
    ValueTooWide { bytes_per_value: usize },
}

impl fmt::Display for SchemaAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroTotalBytes => write!(f, "total_bytes min is 1; set to 1"),
            Self::ZeroValueCount => write!(f, "value_count min is 1; set to 1"),
            Self::InvalidScaleFactor { given } => {
                write!(f, "scale_factor {given} is not a usable divisor; set to 1")
            }
            Self::NegativeRoundDecimals { given } => write!(
                f,
                "round_decimals cannot be negative ({given}); set to {}",
                given.unsigned_abs()
            ),
            Self::UnevenSplit {
                total_bytes,
                value_count,
            } => write!(
                f,
                "total_bytes {total_bytes} does not split evenly into {value_count} values; truncated"
            ),
            Self::ValueTooWide { bytes_per_value } => write!(
                f,
                "bytes_per_value {bytes_per_value} exceeds {MAX_BYTES_PER_VALUE}; clamped"
            ),
        }
    }
}

impl FieldSchema {
    /// Build a schema, logging a warning for every parameter that had to be
    /// corrected.
    pub fn new(
        total_bytes: usize,
        value_count: usize,
        scale_factor: f64,
        signed: bool,
        round_decimals: Option<i32>,
    ) -> Self {
        let (schema, adjustments) =
            Self::normalized(total_bytes, value_count, scale_factor, signed, round_decimals);
        for adjustment in &adjustments {
            tracing::warn!(%adjustment, "field schema normalized");
        }
        schema
    }

    /// Build a schema and return the corrections applied, without logging.
    pub fn normalized(
        total_bytes: usize,
        value_count: usize,
        scale_factor: f64,
        signed: bool,
        round_decimals: Option<i32>,
    ) -> (Self, Vec<SchemaAdjustment>) {
        let mut adjustments = Vec::new();

        let mut total_bytes = total_bytes;
        if total_bytes == 0 {
            adjustments.push(SchemaAdjustment::ZeroTotalBytes);
            total_bytes = 1;
        }
        let mut value_count = value_count;
        if value_count == 0 {
            adjustments.push(SchemaAdjustment::ZeroValueCount);
            value_count = 1;
        }
        let mut scale_factor = scale_factor;
        if scale_factor == 0.0 || !scale_factor.is_finite() {
            adjustments.push(SchemaAdjustment::InvalidScaleFactor {
                given: scale_factor,
            });
            scale_factor = 1.0;
        }
        let round_decimals = round_decimals.map(|given| {
            if given < 0 {
                adjustments.push(SchemaAdjustment::NegativeRoundDecimals { given });
            }
            given.unsigned_abs()
        });

        let mut bytes_per_value = total_bytes / value_count;
        if total_bytes % value_count != 0 {
            adjustments.push(SchemaAdjustment::UnevenSplit {
                total_bytes,
                value_count,
            });
            bytes_per_value = bytes_per_value.max(1);
        }
        if bytes_per_value > MAX_BYTES_PER_VALUE {
            adjustments.push(SchemaAdjustment::ValueTooWide { bytes_per_value });
            bytes_per_value = MAX_BYTES_PER_VALUE;
        }

        let schema = Self {
            total_bytes: bytes_per_value * value_count,
            value_count,
            scale_factor,
            signed,
            round_decimals,
        };
        (schema, adjustments)
    }

    /// Width of the whole field span, all sub-values combined.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn value_count(&self) -> usize {
        self.value_count
    }

    pub fn bytes_per_value(&self) -> usize {
        self.total_bytes / self.value_count
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn signed(&self) -> bool {
        self.signed
    }

    pub fn round_decimals(&self) -> Option<u32> {
        self.round_decimals
    }
}
