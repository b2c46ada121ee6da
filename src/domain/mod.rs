// Domain layer - Request model, failure taxonomy and pure pipeline rules

pub mod errors;
pub mod model;
pub mod rules;
