use thiserror::Error;

use markup::MarkupError;
use sheet::{RenderError, StyleSyntaxError};

/// Any failure of the parse, apply and render pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Style(#[from] StyleSyntaxError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T> = std::result::Result<T, Error>;
