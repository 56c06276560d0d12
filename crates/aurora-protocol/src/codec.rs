//! Codec for framing and serialization of peer messages.

use crate::messages::PeerMessage;
use aurora_base::{Error, Result};

/// Encodes/decodes distributor messages.
pub struct PeerCodec;

impl PeerCodec {
    /// Encodes a peer message to bytes.
    pub fn encode(msg: &PeerMessage) -> Result<Vec<u8>> {
        rkyv::to_bytes::<rkyv::rancor::Error>(msg)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Decodes a peer message from bytes.
    pub fn decode(bytes: &[u8]) -> Result<PeerMessage> {
        rkyv::from_bytes::<PeerMessage, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Frames a message with a length prefix (4 bytes, big-endian), for
    /// stream transports.
    #[must_use]
    pub fn frame(data: &[u8]) -> Vec<u8> {
        let len = data.len() as u32;
        let mut framed = Vec::with_capacity(4 + data.len());
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(data);
        framed
    }

    /// Reads the frame length from a 4-byte prefix.
    #[must_use]
    pub fn read_frame_len(header: &[u8; 4]) -> u32 {
        u32::from_be_bytes(*header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::*;

    #[test]
    fn test_roundtrip_steal_request() {
        let encoded = PeerCodec::encode(&PeerMessage::StealRequest).unwrap();
        let decoded = PeerCodec::decode(&encoded).unwrap();
        assert!(matches!(decoded, PeerMessage::StealRequest));
    }

    #[test]
    fn test_roundtrip_steal_reply() {
        let msg = PeerMessage::StealReply(Some(WireItem {
            decisions: vec![3, -1, 2],
            max_unsat: 1,
        }));
        let decoded = PeerCodec::decode(&PeerCodec::encode(&msg).unwrap()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_roundtrip_solution_batch() {
        let msg = PeerMessage::SolutionBatch(vec![WireSolution {
            bits: vec![0b101],
            num_vars: 3,
            unsat: 0,
        }]);
        let decoded = PeerCodec::decode(&PeerCodec::encode(&msg).unwrap()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_frame_prefix() {
        let data = PeerCodec::encode(&PeerMessage::Token { black: true }).unwrap();
        let framed = PeerCodec::frame(&data);
        let mut header = [0u8; 4];
        header.copy_from_slice(&framed[..4]);
        assert_eq!(PeerCodec::read_frame_len(&header) as usize, data.len());
        assert_eq!(&framed[4..], &data[..]);
    }
}
