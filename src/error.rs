use crate::mp4box::BoxType;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    #[error("{0:?} not found")]
    BoxNotFound(BoxType),

    #[error("trun sample count overflow")]
    TrunSampleCountOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
