pub(crate) mod health;
pub(crate) mod portfolio;
pub(crate) mod market;
pub(crate) mod community;
pub(crate) mod assistant;
