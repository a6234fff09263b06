// Domain layer: models and ports. Concrete stores and consoles live in `adapters`.

pub mod model;
pub mod ports;
