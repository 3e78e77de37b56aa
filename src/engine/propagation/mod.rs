mod propagation_context;
mod propagation_engine;
mod propagator;

pub(crate) use propagation_context::{PropagationContext, PropagationContextMut};
pub(crate) use propagation_engine::{EngineConflict, PropagationEngine};
pub(crate) use propagator::{priority, PostPropagator};
