/// Role of this half on the split link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitState {
    /// No handshake has completed yet.
    Undetermined,
    /// This half owns USB and polls the other one.
    Controller,
    /// This half answers scan requests from the controller.
    Receiver,
}
