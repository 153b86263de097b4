use embedded_hal_0_2::timer::CountDown;
use heapless::Vec;

use crate::keyboard::KeySwitchIdentifier;

use super::{Connection, ConnectionExt, Error, Message, SplitState};

/// Runs the request/reply protocol over a [`Connection`] and caches the far
/// side's most recent scan.
pub struct SplitCommunicator<
    const SZ: usize,
    const RO: usize,
    SI: KeySwitchIdentifier<SZ>,
    S: Connection,
    C: CountDown,
> where
    C::Time: Copy,
{
    connection: S,
    state: SplitState,
    timer: C,
    buffer: Vec<SI, RO>,
    timeout: C::Time,
}

impl<const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>, S: Connection, C: CountDown>
    SplitCommunicator<SZ, RO, SI, S, C>
where
    C::Time: Copy,
{
    pub fn new(connection: S, timer: C, timeout: C::Time) -> Self {
        SplitCommunicator {
            connection,
            state: SplitState::Undetermined,
            timer,
            buffer: Vec::new(),
            timeout,
        }
    }

    pub fn state(&self) -> SplitState {
        self.state
    }

    pub fn establish(&mut self) -> Result<(), Error<S::Error>> {
        self.state = SplitState::Undetermined;
        self.connection.send_message(Message::<SZ, RO, SI>::Probe);
        self.state = match self.read()? {
            Message::Ack => {
                defmt::info!("Split connection established");
                SplitState::Controller
            }
            _ => {
                defmt::warn!("Unexpected response to probe");
                SplitState::Undetermined
            }
        };
        Ok(())
    }

    /// Handles one incoming frame. Called when the connection signals
    /// available data.
    pub fn respond(&mut self, switches: &Vec<SI, RO>) {
        match self.read() {
            Ok(Message::ScanRequest(far)) => {
                self.buffer = far;
                self.connection
                    .send_message(Message::ScanReply(switches.clone()));
            }
            Ok(Message::ScanReply(far)) => {
                // A straggling reply; keep it rather than drop it.
                self.buffer = far;
            }
            Ok(Message::Probe) => {
                self.connection.send_message(Message::<SZ, RO, SI>::Ack);
                self.state = SplitState::Receiver;
            }
            Ok(Message::Ack) => {
                defmt::warn!("Unexpected ack");
            }
            Err(e) => {
                defmt::warn!("Failed to receive frame: {}", e);
            }
        }
    }

    /// Returns the far side's held switches. The controller asks the
    /// receiver; the receiver answers from the requests it has seen.
    pub fn request(&mut self, switches: &Vec<SI, RO>) -> Vec<SI, RO> {
        match self.state {
            SplitState::Controller => {
                self.connection
                    .send_message(Message::ScanRequest(switches.clone()));
                match self.read() {
                    Ok(Message::ScanReply(far)) => {
                        self.buffer = far.clone();
                        far
                    }
                    Ok(_) => {
                        defmt::warn!("Unexpected reply to scan request");
                        self.buffer.clone()
                    }
                    Err(e) => {
                        defmt::warn!("Failed to receive scan reply: {}", e);
                        self.buffer.clone()
                    }
                }
            }
            SplitState::Receiver => self.buffer.clone(),
            SplitState::Undetermined => Vec::new(),
        }
    }

    fn read(&mut self) -> Result<Message<SZ, RO, SI>, Error<S::Error>> {
        self.connection.read_message(&mut self.timer, self.timeout)
    }
}
