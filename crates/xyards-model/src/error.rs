use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Failures raised by the expected-yards pipeline.
#[derive(Debug)]
pub enum XyardsError {
    /// Feature vector or artifact columns disagree with the trained encoding.
    SchemaMismatch {
        expected: usize,
        found: usize,
        detail: String,
    },
    /// A mandatory column is absent from the header, or a mandatory cell is
    /// empty/unparseable in a row (`row` is 1-based, `None` for the header).
    MissingRequiredField { field: String, row: Option<usize> },
    /// Category not present at training time. Only ever logged: the encoder
    /// recovers through the fallback column.
    UnseenCategory { field: String, value: String },
    ModelArtifactMissing(PathBuf),
    ModelArtifactCorrupt { path: PathBuf, reason: String },
    ModelNotTrained,
    EmptyTrainingSet,
    InvalidLabel { index: usize, value: f32 },
    InvalidSituation(String),
    InvalidFeatureValue { column: String, value: f32 },
    InvalidConfig(String),
    Io(std::io::Error),
}

impl XyardsError {
    /// Errors that should be presented as "train a model first" rather than
    /// as a failure of the current request.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            XyardsError::ModelArtifactMissing(_) | XyardsError::ModelArtifactCorrupt { .. }
        )
    }
}

impl fmt::Display for XyardsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            XyardsError::SchemaMismatch {
                expected,
                found,
                detail,
            } => write!(
                f,
                "Feature schema mismatch: model expects {} columns, got {} ({})",
                expected, found, detail
            ),
            XyardsError::MissingRequiredField { field, row: Some(row) } => {
                write!(f, "Missing required field '{}' at row {}", field, row)
            }
            XyardsError::MissingRequiredField { field, row: None } => {
                write!(f, "Missing required column '{}'", field)
            }
            XyardsError::UnseenCategory { field, value } => write!(
                f,
                "Unseen {} category '{}', using fallback encoding",
                field, value
            ),
            XyardsError::ModelArtifactMissing(path) => {
                write!(f, "Model artifact not found: {}", path.display())
            }
            XyardsError::ModelArtifactCorrupt { path, reason } => write!(
                f,
                "Model artifact {} is unusable: {}",
                path.display(),
                reason
            ),
            XyardsError::ModelNotTrained => write!(f, "Model has not been trained"),
            XyardsError::EmptyTrainingSet => write!(f, "Training set is empty"),
            XyardsError::InvalidLabel { index, value } => {
                write!(f, "Invalid yards-gained label {} at record {}", value, index)
            }
            XyardsError::InvalidSituation(msg) => write!(f, "Invalid game situation: {}", msg),
            XyardsError::InvalidFeatureValue { column, value } => {
                write!(f, "Non-finite value {} in feature column '{}'", value, column)
            }
            XyardsError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            XyardsError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for XyardsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            XyardsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for XyardsError {
    fn from(e: std::io::Error) -> Self {
        XyardsError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, XyardsError>;
