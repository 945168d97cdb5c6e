//! Non-blocking UDP receiver for OSC talk events.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};

use rosc::OscPacket;

use crate::ingress::ActivityIngress;

pub struct OscReceiver {
    socket: UdpSocket,
    buf: Vec<u8>,
}

impl OscReceiver {
    pub fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;
        log::info!("Listening for OSC on {}", socket.local_addr()?);
        Ok(Self {
            socket,
            buf: vec![0; rosc::decoder::MTU],
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Read every datagram currently queued without blocking, handing each
    /// decoded packet to `on_packet`. Returns the number of packets decoded.
    pub fn drain(&mut self, mut on_packet: impl FnMut(&OscPacket)) -> usize {
        let mut decoded = 0;
        loop {
            match self.socket.recv_from(&mut self.buf) {
                Ok((len, from)) => match rosc::decoder::decode_udp(&self.buf[..len]) {
                    Ok((_, packet)) => {
                        on_packet(&packet);
                        decoded += 1;
                    }
                    Err(err) => log::warn!("undecodable OSC datagram from {from}: {err:?}"),
                },
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    log::debug!("OSC receive error: {err}");
                    break;
                }
            }
        }
        decoded
    }

    /// Drain the socket and apply the newest valid talk event to `flags`.
    /// Returns whether a valid event was applied.
    pub fn drain_into(&mut self, ingress: &ActivityIngress, flags: &mut [bool]) -> bool {
        let mut applied = false;
        let count = self.drain(|packet| applied |= ingress.apply_packet(packet, flags));
        if count > 0 {
            log::debug!("drained {count} OSC packets");
        }
        applied
    }
}
