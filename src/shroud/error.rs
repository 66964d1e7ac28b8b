use super::sequences::SheetId;
use std::fmt;
use std::io;

/// Which of the two overlay layers something belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Shroud,
    Fog,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Shroud => write!(f, "shroud"),
            LayerKind::Fog => write!(f, "fog"),
        }
    }
}

/// Error type for shroud renderer setup. Every variant is a data consistency
/// fault found while loading; none can happen once rendering has started.
#[derive(Debug)]
pub enum ShroudError {
    Io(io::Error),
    Config(toml::de::Error),
    VariantCountMismatch { shroud: usize, fog: usize },
    OverrideMismatch,
    NoVariants,
    TooManyVariants(usize),
    TooManyIndices(usize),
    EmptyIndex,
    InvalidEdgeIndex(u8),
    MissingSequence { sequence: String, variant: String },
    MissingFrame { sequence: String, variant: String, frame: usize },
    MissingSheet(SheetId),
    MultipleSheets(LayerKind),
    MixedBlendModes(LayerKind),
}

impl From<io::Error> for ShroudError {
    fn from(err: io::Error) -> Self {
        ShroudError::Io(err)
    }
}

impl From<toml::de::Error> for ShroudError {
    fn from(err: toml::de::Error) -> Self {
        ShroudError::Config(err)
    }
}

impl fmt::Display for ShroudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShroudError::Io(e) => write!(f, "IO error: {}", e),
            ShroudError::Config(e) => write!(f, "Invalid shroud settings: {}", e),
            ShroudError::VariantCountMismatch { shroud, fog } => write!(
                f,
                "Shroud and fog must define the same number of variants (shroud: {}, fog: {})",
                shroud, fog
            ),
            ShroudError::OverrideMismatch => {
                write!(f, "Cannot define a full-tile override for only one of shroud or fog")
            }
            ShroudError::NoVariants => write!(f, "At least one shroud variant is required"),
            ShroudError::TooManyVariants(n) => {
                write!(f, "Cannot define {} shroud and fog variants (max {})", n, u8::MAX)
            }
            ShroudError::TooManyIndices(n) => write!(
                f,
                "Cannot define {} indexes for shroud directions (max {})",
                n,
                u8::MAX - 1
            ),
            ShroudError::EmptyIndex => write!(f, "The shroud direction index table is empty"),
            ShroudError::InvalidEdgeIndex(bits) => {
                write!(f, "Index entry {:#04x} is not a valid edge combination", bits)
            }
            ShroudError::MissingSequence { sequence, variant } => {
                write!(f, "Sequence {}.{} is not defined", sequence, variant)
            }
            ShroudError::MissingFrame {
                sequence,
                variant,
                frame,
            } => write!(f, "Sequence {}.{} has no frame {}", sequence, variant, frame),
            ShroudError::MissingSheet(id) => write!(f, "Sprite sheet {} is not defined", id.0),
            ShroudError::MultipleSheets(layer) => write!(
                f,
                "{} sprites span multiple sheets; pack their sequences onto one sheet",
                layer
            ),
            ShroudError::MixedBlendModes(layer) => {
                write!(f, "{} sprites must all use the same blend mode", layer)
            }
        }
    }
}

impl std::error::Error for ShroudError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShroudError::Io(e) => Some(e),
            ShroudError::Config(e) => Some(e),
            _ => None,
        }
    }
}
