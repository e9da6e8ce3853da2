// Domain layer: plan entities and the ports to external collaborators.

pub mod model;
pub mod ports;
