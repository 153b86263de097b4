use crate::{keyboard::KeySwitchIdentifier, Vec};

/// Frames exchanged between the two halves.
#[derive(Debug, Clone)]
pub enum Message<const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>> {
    /// Controller's held switches, sent to the receiver once per scan.
    ScanRequest(Vec<SI, RO>),
    /// Receiver's held switches, sent back in answer to a request.
    ScanReply(Vec<SI, RO>),
    /// Role negotiation: the USB half probes for a receiver at startup.
    Probe,
    /// Receiver's answer to a probe.
    Ack,
}
