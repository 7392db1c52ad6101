use crossbeam_channel::{Receiver, Sender};

/// Signals that flow from the Entry Feeder to the Crane Runner when the
/// yard's plan is no longer guaranteed optimal and a replan is due.
#[derive(Clone, Debug)]
pub enum ArrivalSignal {
    ContainerArrived { id: String, due_in: i64 },
}

/// One end of the arrival channel, handed to the Entry Feeder.
pub struct ArrivalSender {
    pub sender: Sender<ArrivalSignal>,
}

/// The Crane Runner's end: drains whatever arrived since it last looked,
/// without blocking.
pub struct ArrivalReceiver {
    pub receiver: Receiver<ArrivalSignal>,
}

impl ArrivalReceiver {
    /// Returns every signal currently queued, oldest first.
    pub fn drain(&self) -> Vec<ArrivalSignal> {
        self.receiver.try_iter().collect()
    }
}

pub fn arrival_channel() -> (ArrivalSender, ArrivalReceiver) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (ArrivalSender { sender }, ArrivalReceiver { receiver })
}
