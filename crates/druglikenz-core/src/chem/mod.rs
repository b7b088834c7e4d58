//! Minimal cheminformatics: a SMILES reader and the graph descriptors
//! used by the local descriptor source.

pub mod crippen;
pub mod descriptors;
pub mod element;
pub mod molecule;
pub mod ring;
pub mod smiles;

pub use molecule::Molecule;
pub use smiles::parse_smiles;

/// A SMILES string that could not be read as a structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {position}")]
pub struct SmilesError {
    /// Byte offset where reading stopped.
    pub position: usize,
    pub message: String,
}

impl SmilesError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        SmilesError {
            position,
            message: message.into(),
        }
    }
}
