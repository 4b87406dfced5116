pub(crate) mod observation;
pub(crate) mod quarterly;
