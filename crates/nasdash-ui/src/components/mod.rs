pub(crate) mod card;
pub(crate) mod chart;
pub(crate) mod shell;
pub(crate) mod status;
