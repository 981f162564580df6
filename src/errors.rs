use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidParameters(String),

    #[error("Invalid speed range: minAvailableSpeed ({min_available_speed:?}) must be non-negative and less than or equal to maxAvailableSpeed ({max_available_speed:?}).")]
    InvalidSpeedRange {
        min_available_speed: f64,
        max_available_speed: f64,
    },

    #[error("The specified key value {key:?} must lie between the minimum {min:?} and maximum {max:?} keys in the map.")]
    KeyOutOfRange { key: f64, min: f64, max: f64 },

    #[error("Cannot look up key {key:?} in an empty series")]
    EmptySeries { key: f64 },

    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),

    #[error("Conveyor '{conveyor_id}' has no split function for its connection to conveyor '{target_id}'")]
    MissingSplitFunction { conveyor_id: u32, target_id: u32 },

    #[error("Wrong Conveyor id => conveyor '{0}' is declared more than once")]
    DuplicateConveyorId(u32),

    #[error("Conveyor '{conveyor_id}' referenced by conveyor '{referenced_by}' does not exist")]
    ConveyorNotFound { conveyor_id: u32, referenced_by: u32 },

    #[error("Connections between conveyors {0:?} form a cycle")]
    CyclicConnections(Vec<u32>),

    #[error("Transport system '{0}' is scheduled but was never loaded")]
    UnknownTransportSystem(String),

    #[error("Invalid cell format '{0}', expected something like '%8.3f'")]
    InvalidCellFormat(String),

    #[error(transparent)]
    DeserializationError(#[from] DeserializationError),

    #[error("{0}")]
    Other(String),
}

/// An error that can be returned when deserializing data.
#[derive(Debug, Error)]
#[error("Cannot deserialize string '{string}': {source}")]
pub struct DeserializationError {
    pub string: String,
    pub source: DeserializationErrorKind,
}

/// Additional information for [`DeserializationError`] error
#[derive(Debug, Error)]
pub enum DeserializationErrorKind {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error(transparent)]
    YamlError(#[from] serde_yaml::Error),

    #[error(transparent)]
    CsvError(#[from] csv::Error),

    #[error(transparent)]
    NumberError(#[from] std::num::ParseFloatError),
}
