/// The rasterizer's result type.
pub type RasterResult = Result<(), RasterError>;

/// Describes an unexpected error happening while processing a sorted
/// vector path.
///
/// These indicate either a malformed input or a bug in the sweep; callers
/// are not expected to recover beyond dropping the operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InternalError {
    /// An input segment had fewer than two points.
    SegmentTooShort,
    /// An input segment's points were not in non-decreasing y order.
    NonMonotoneSegment,
    /// Two output segments cross in their interior.
    SegmentsCross,
    ErrorCode(i16),
}

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InternalError::SegmentTooShort => {
                write!(f, "Segment with fewer than two points")
            }
            InternalError::NonMonotoneSegment => {
                write!(f, "Segment points are not monotone in y")
            }
            InternalError::SegmentsCross => {
                write!(f, "Segment interiors cross")
            }
            InternalError::ErrorCode(i) => {
                write!(f, "Error code: #{}", i)
            }
        }
    }
}

impl std::error::Error for InternalError {}

/// The rasterizer's error enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RasterError {
    UnsupportedParameter(UnsupportedParameter),
    Internal(InternalError),
}

impl core::fmt::Display for RasterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RasterError::UnsupportedParameter(e) => {
                write!(f, "Unsupported parameter: {}", e)
            }
            RasterError::Internal(e) => {
                write!(f, "Internal error: {}", e)
            }
        }
    }
}

impl std::error::Error for RasterError {}

impl From<InternalError> for RasterError {
    fn from(value: InternalError) -> Self {
        RasterError::Internal(value)
    }
}

impl From<UnsupportedParameter> for RasterError {
    fn from(value: UnsupportedParameter) -> Self {
        RasterError::UnsupportedParameter(value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnsupportedParameter {
    PositionIsNaN,
    InvalidLineWidth,
    InvalidMiterLimit,
}

impl core::fmt::Display for UnsupportedParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UnsupportedParameter::PositionIsNaN => {
                write!(f, "Position is not a number")
            }
            UnsupportedParameter::InvalidLineWidth => {
                write!(f, "Line width must be finite and positive")
            }
            UnsupportedParameter::InvalidMiterLimit => {
                write!(f, "Miter limit must be greater than or equal to 1")
            }
        }
    }
}

impl std::error::Error for UnsupportedParameter {}
