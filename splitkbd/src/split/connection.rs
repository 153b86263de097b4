use core::fmt::Debug;

use embedded_hal_0_2::timer::CountDown;

use crate::{keyboard::KeySwitchIdentifier, split::Error, Vec};

use super::Message;

/// Byte transport between the two halves, usually a UART.
pub trait Connection {
    type Error: 'static + defmt::Format + Debug;

    fn read_raw(&self, buffer: &mut [u8]) -> nb::Result<usize, Self::Error>;

    fn write(&self, data: &[u8]);

    fn read(&self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        let mut offset = 0;
        while offset != buffer.len() {
            offset += match self.read_raw(&mut buffer[offset..]) {
                Ok(bytes_read) => bytes_read,
                Err(e) => match e {
                    nb::Error::Other(source) => return Err(source),
                    nb::Error::WouldBlock => continue,
                },
            }
        }
        Ok(())
    }
}

const HEAD_SCAN_REQUEST: u8 = 0x02;
const HEAD_SCAN_REPLY: u8 = 0x03;
const HEAD_PROBE: u8 = 0xf0;
const HEAD_ACK: u8 = 0xf1;

/// Largest frame: head, length, then one identifier per held switch.
const MAX_FRAME_LEN: usize = 64;

pub trait ConnectionExt: Connection {
    fn read_message<C: CountDown, const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>>(
        &self,
        timer: &mut C,
        timeout: impl Into<C::Time>,
    ) -> Result<Message<SZ, RO, SI>, Error<Self::Error>> {
        assert!(
            MAX_FRAME_LEN >= SZ * RO + 2,
            "MAX_FRAME_LEN must hold RO identifiers of SZ bytes plus the frame head"
        );
        let mut buf = [0u8; MAX_FRAME_LEN];
        self.read_with_timeout(&mut buf[..1], timer, timeout)?;
        let head = buf[0];
        match head {
            HEAD_SCAN_REQUEST | HEAD_SCAN_REPLY => {
                let ctor = if head == HEAD_SCAN_REQUEST {
                    Message::ScanRequest
                } else {
                    Message::ScanReply
                };
                self.read(&mut buf[..1])
                    .map_err(|source| Error::Read { source })?;
                let len = buf[0] as usize;
                if len == 0 {
                    Ok(ctor(Vec::new()))
                } else if len > RO {
                    Err(Error::TooManySwitches)
                } else {
                    self.read(&mut buf[..(len * SZ)])
                        .map_err(|source| Error::Read { source })?;
                    let switches = (0..len)
                        .map(|x| x * SZ)
                        .map(|x| {
                            let mut bytes = [0; SZ];
                            bytes.copy_from_slice(&buf[x..(x + SZ)]);
                            bytes.into()
                        })
                        .collect();
                    Ok(ctor(switches))
                }
            }
            HEAD_PROBE => Ok(Message::Probe),
            HEAD_ACK => Ok(Message::Ack),
            _ => Err(Error::UnknownHead { head }),
        }
    }

    fn send_message<const SZ: usize, const RO: usize, SI: KeySwitchIdentifier<SZ>>(
        &self,
        message: Message<SZ, RO, SI>,
    ) {
        assert!(
            MAX_FRAME_LEN >= SZ * RO + 2,
            "MAX_FRAME_LEN must hold RO identifiers of SZ bytes plus the frame head"
        );
        match message {
            Message::ScanRequest(ref switches) | Message::ScanReply(ref switches) => {
                let head = if let Message::ScanRequest(_) = message {
                    HEAD_SCAN_REQUEST
                } else {
                    HEAD_SCAN_REPLY
                };
                let len = switches.len() as u8;
                let data = core::iter::once(head)
                    .chain(core::iter::once(len))
                    .chain(
                        switches
                            .iter()
                            .flat_map(|switch| -> [u8; SZ] { (*switch).into() }),
                    )
                    .collect::<Vec<u8, MAX_FRAME_LEN>>();
                self.write(&data);
            }
            Message::Probe => {
                self.write(&[HEAD_PROBE]);
            }
            Message::Ack => {
                self.write(&[HEAD_ACK]);
            }
        }
    }

    fn read_with_timeout<C: CountDown>(
        &self,
        buffer: &mut [u8],
        timer: &mut C,
        timeout: impl Into<C::Time>,
    ) -> Result<(), Error<Self::Error>> {
        timer.start(timeout);
        let mut offset = 0;
        while offset != buffer.len() {
            if timer.wait().is_ok() {
                return Err(Error::ReadTimedOut);
            }
            offset += match self.read_raw(&mut buffer[offset..]) {
                Ok(bytes_read) => bytes_read,
                Err(e) => match e {
                    nb::Error::Other(source) => return Err(Error::Read { source }),
                    nb::Error::WouldBlock => continue,
                },
            }
        }
        Ok(())
    }
}

impl<T: Connection> ConnectionExt for T {}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    struct Id {
        row: u8,
        col: u8,
    }

    impl From<[u8; 2]> for Id {
        fn from(value: [u8; 2]) -> Self {
            Id {
                row: value[0],
                col: value[1],
            }
        }
    }

    impl From<Id> for [u8; 2] {
        fn from(value: Id) -> Self {
            [value.row, value.col]
        }
    }

    impl crate::keyboard::KeySwitchIdentifier<2> for Id {}

    #[derive(Debug, defmt::Format)]
    struct NoError;

    /// Everything written comes back out of `read_raw`.
    struct Loopback {
        buffer: RefCell<std::vec::Vec<u8>>,
    }

    impl Loopback {
        fn new() -> Self {
            Loopback {
                buffer: RefCell::new(std::vec::Vec::new()),
            }
        }
    }

    impl Connection for Loopback {
        type Error = NoError;

        fn read_raw(&self, buffer: &mut [u8]) -> nb::Result<usize, NoError> {
            let mut data = self.buffer.borrow_mut();
            if data.is_empty() {
                return Err(nb::Error::WouldBlock);
            }
            let n = buffer.len().min(data.len());
            buffer[..n].copy_from_slice(&data[..n]);
            data.drain(..n);
            Ok(n)
        }

        fn write(&self, data: &[u8]) {
            self.buffer.borrow_mut().extend_from_slice(data);
        }
    }

    struct FakeTimer {
        expired: bool,
    }

    impl CountDown for FakeTimer {
        type Time = u32;

        fn start<T: Into<u32>>(&mut self, _count: T) {}

        fn wait(&mut self) -> nb::Result<(), void::Void> {
            if self.expired {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }

    #[test]
    fn scan_request_round_trips() {
        let link = Loopback::new();
        let mut timer = FakeTimer { expired: false };
        let switches: Vec<Id, 8> = [Id { row: 1, col: 2 }, Id { row: 3, col: 4 }]
            .into_iter()
            .collect();
        link.send_message(Message::<2, 8, Id>::ScanRequest(switches.clone()));
        match link.read_message::<_, 2, 8, Id>(&mut timer, 10u32) {
            Ok(Message::ScanRequest(read)) => assert_eq!(read, switches),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn empty_reply_round_trips() {
        let link = Loopback::new();
        let mut timer = FakeTimer { expired: false };
        link.send_message(Message::<2, 8, Id>::ScanReply(Vec::new()));
        match link.read_message::<_, 2, 8, Id>(&mut timer, 10u32) {
            Ok(Message::ScanReply(read)) => assert!(read.is_empty()),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn probe_and_ack_are_single_byte_frames() {
        let link = Loopback::new();
        let mut timer = FakeTimer { expired: false };
        link.send_message(Message::<2, 8, Id>::Probe);
        assert!(matches!(
            link.read_message::<_, 2, 8, Id>(&mut timer, 10u32),
            Ok(Message::Probe)
        ));
        link.send_message(Message::<2, 8, Id>::Ack);
        assert!(matches!(
            link.read_message::<_, 2, 8, Id>(&mut timer, 10u32),
            Ok(Message::Ack)
        ));
    }

    #[test]
    fn silence_times_out() {
        let link = Loopback::new();
        let mut timer = FakeTimer { expired: true };
        assert!(matches!(
            link.read_message::<_, 2, 8, Id>(&mut timer, 10u32),
            Err(Error::ReadTimedOut)
        ));
    }

    #[test]
    fn garbage_head_is_rejected() {
        let link = Loopback::new();
        let mut timer = FakeTimer { expired: false };
        link.write(&[0x42]);
        assert!(matches!(
            link.read_message::<_, 2, 8, Id>(&mut timer, 10u32),
            Err(Error::UnknownHead { head: 0x42 })
        ));
    }

    #[test]
    fn oversized_frames_are_rejected() {
        let link = Loopback::new();
        let mut timer = FakeTimer { expired: false };
        // A reply claiming more switches than the rollover allows.
        link.write(&[0x03, 9]);
        assert!(matches!(
            link.read_message::<_, 2, 8, Id>(&mut timer, 10u32),
            Err(Error::TooManySwitches)
        ));
    }
}
