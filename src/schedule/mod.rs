//! Call scheduling: wrapper state machine, timer registry, and factory.

mod damper;
mod factory;
mod registry;
mod variant;

pub use damper::Damper;
pub use factory::DamperFactory;
pub use registry::TimerRegistry;
pub use variant::Variant;
