// Domain layer: models and ports. Engine, network and console live in adapters.

pub mod model;
pub mod ports;
