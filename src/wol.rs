//! Wake-on-LAN magic packet construction and sending.
//!
//! A magic packet is 6 bytes of `0xFF` followed by the target MAC address
//! repeated 16 times, sent as a UDP datagram to a broadcast address
//! (conventionally port 9). Sent natively rather than shelling out to the
//! `wakeonlan` utility.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::debug;

/// Magic packet size: 6-byte sync stream + 16 MAC repetitions.
pub const MAGIC_PACKET_LEN: usize = 6 + 16 * 6;

/// Wake-on-LAN operation error.
#[derive(Debug, Error)]
pub enum WolError {
    #[error("invalid MAC address '{input}': {reason}")]
    InvalidMac { input: String, reason: String },

    #[error("failed to send magic packet: {0}")]
    Send(#[from] std::io::Error),
}

/// A 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddr {
    type Err = WolError;

    /// Accepts `aa:bb:cc:dd:ee:ff` and `aa-bb-cc-dd-ee-ff` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| WolError::InvalidMac {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let separator = if s.contains(':') { ':' } else { '-' };
        let parts: Vec<&str> = s.trim().split(separator).collect();
        if parts.len() != 6 {
            return Err(invalid("expected 6 octets"));
        }

        let mut octets = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            octets[i] = u8::from_str_radix(part, 16)
                .map_err(|_| invalid("octets must be two hex digits"))?;
            if part.len() != 2 {
                return Err(invalid("octets must be two hex digits"));
            }
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

/// Build the 102-byte magic packet for a MAC address.
pub fn magic_packet(mac: MacAddr) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFFu8; MAGIC_PACKET_LEN];
    for repetition in packet[6..].chunks_exact_mut(6) {
        repetition.copy_from_slice(&mac.0);
    }
    packet
}

/// Send a magic packet for `mac` to `broadcast:port` over UDP.
///
/// Binds an ephemeral local socket and enables `SO_BROADCAST`. Delivery is
/// fire-and-forget; WOL has no acknowledgement.
pub async fn send_magic_packet(mac: MacAddr, broadcast: IpAddr, port: u16) -> Result<(), WolError> {
    let bind_addr = if broadcast.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.set_broadcast(true)?;

    let packet = magic_packet(mac);
    socket.send_to(&packet, (broadcast, port)).await?;
    debug!(mac = %mac, %broadcast, port, "sent wake-on-LAN magic packet");
    Ok(())
}
