use thiserror::Error;

/// Errors raised while running the executor/reactor simulation.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("could not read persisted plan file {path}: {source}")]
    PlanFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("plan token error: {0}")]
    MalformedToken(#[from] yard_core::encode::PlanTokenError),
    #[error("crane thread panicked")]
    CraneThreadPanicked,
    #[error("entry feeder thread panicked")]
    EntryFeederThreadPanicked,
    #[error("outgoing drainer thread panicked")]
    OutgoingDrainerThreadPanicked,
}
