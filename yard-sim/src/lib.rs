//! Reactive executor for the hot storage yard: the Entry Feeder, Crane
//! Runner and Outgoing Drainer actors coordinating over a shared yard
//! state, pausing and replanning whenever new containers arrive.

pub mod crane_runner;
pub mod entry_feeder;
pub mod error;
pub mod executor;
pub mod outgoing_drainer;
pub mod signals;
pub mod yard;

pub use error::ExecutorError;
pub use executor::{Executor, ExecutorHandle};
pub use yard::SharedYard;
