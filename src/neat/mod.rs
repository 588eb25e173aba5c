pub mod body;
pub mod error;
pub mod genome;
pub mod network;
pub mod organism;
pub mod selection;
pub mod species;
pub mod training;
mod vector;

#[cfg(test)]
pub(crate) mod test_support;
