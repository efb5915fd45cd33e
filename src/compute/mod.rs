//! Join computation: spatial index, containment, weight aggregation and output schema.

pub mod join;
pub mod schema;
pub mod spatial;
pub mod validation;
pub mod weight;
