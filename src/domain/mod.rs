// Domain layer: wire models, the page model and the ports the handlers depend on.

pub mod model;
pub mod page;
pub mod ports;
