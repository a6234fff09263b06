// Application layer: the concrete services shipped with the binary.

pub mod services;
