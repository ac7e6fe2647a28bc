pub(crate) mod compiler;
pub(crate) mod dedup;
pub(crate) mod pass;
pub(crate) mod recorder;
pub(crate) mod validate;
