// Domain layer: core models and ports (interfaces). No HTTP or file access here.

pub mod model;
pub mod ports;
