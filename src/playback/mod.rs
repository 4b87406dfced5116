pub(crate) mod controller;
pub(crate) mod player;
pub(crate) mod scheduler;
pub(crate) mod state;
