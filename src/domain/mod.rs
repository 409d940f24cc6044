// Domain layer: the car record, format tags and the storage/codec ports.

pub mod model;
pub mod ports;
