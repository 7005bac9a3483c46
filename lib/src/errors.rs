use thiserror::Error;

use crate::re::parser::Error as ParseError;
use crate::re::BuildError;

/// Errors returned by [`crate::compile`].
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    BuildError(#[from] BuildError),
}
