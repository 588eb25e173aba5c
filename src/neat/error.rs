use thiserror::Error;

/// Reasons a breeding candidate could not be picked.
#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("no viable breeding candidate: total fitness is {total_fitness}")]
    NoViableCandidate { total_fitness: f64 },
    #[error("cannot select from an empty population")]
    EmptyPopulation,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("number_of_inputs must be non-zero")]
    NoInputs,
    #[error("number_of_outputs must be non-zero")]
    NoOutputs,
    #[error("compatibility threshold {0} must be finite and not negative")]
    InvalidCompatibilityThreshold(f64),
    #[error("{name} coefficient {value} must be finite and not negative")]
    InvalidCoefficient { name: &'static str, value: f64 },
}
