pub(crate) mod error;
pub(crate) mod gltype;
pub(crate) mod handle;
