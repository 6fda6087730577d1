use bytes::{Bytes, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

use crate::api::policy_dto::BridgeMessage;

/// Combines LengthDelimitedCodec (4 byte big-endian length prefix) with JSON.
#[derive(Debug)]
pub struct BridgeCodec {
    codec: LengthDelimitedCodec,
}

impl BridgeCodec {
    pub fn new() -> Self {
        Self { codec: LengthDelimitedCodec::new() }
    }
}

impl Default for BridgeCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder<BridgeMessage> for BridgeCodec {
    type Error = io::Error;

    fn encode(&mut self, item: BridgeMessage, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let bytes = serde_json::to_vec(&item).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.codec.encode(Bytes::from(bytes), dst)
    }
}

impl Decoder for BridgeCodec {
    type Item = BridgeMessage;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.codec.decode(src)? {
            Some(bytes) => {
                let item = serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }
}
