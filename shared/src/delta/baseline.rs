use log::trace;

use replica_serde::{ByteReader, ByteWrite, Serde, SerdeErr};

use super::{
    codec::DeltaCodec,
    error::DeltaError,
    snapshot::{Delta, Snapshot},
};

/// One state update on the wire
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncPayload {
    Full(Snapshot),
    Delta(Delta),
}

impl SyncPayload {
    pub fn is_full(&self) -> bool {
        matches!(self, SyncPayload::Full(_))
    }
}

impl Serde for SyncPayload {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        match self {
            SyncPayload::Full(snapshot) => {
                writer.write_byte(0);
                snapshot.ser(writer);
            }
            SyncPayload::Delta(delta) => {
                writer.write_byte(1);
                delta.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(SyncPayload::Full(Snapshot::de(reader)?)),
            1 => Ok(SyncPayload::Delta(Delta::de(reader)?)),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "SyncPayload",
                tag,
            }),
        }
    }

    fn byte_length(&self) -> u32 {
        1 + match self {
            SyncPayload::Full(snapshot) => snapshot.byte_length(),
            SyncPayload::Delta(delta) => delta.byte_length(),
        }
    }
}

/// Sending half of a delta session: remembers the last snapshot sent and
/// encodes each new one against it
#[derive(Debug, Default)]
pub struct BaselineEncoder {
    codec: DeltaCodec,
    baseline: Option<Snapshot>,
}

impl BaselineEncoder {
    pub fn new(codec: DeltaCodec) -> Self {
        Self {
            codec,
            baseline: None,
        }
    }

    pub fn encode(&mut self, next: Snapshot) -> SyncPayload {
        let payload = match &self.baseline {
            None => SyncPayload::Full(next.clone()),
            Some(baseline) => {
                let delta = self.codec.compute_delta(baseline, &next);
                trace!(
                    "BaselineEncoder: {} byte snapshot sent as {} byte delta",
                    next.len(),
                    delta.len()
                );
                SyncPayload::Delta(delta)
            }
        };
        self.baseline = Some(next);
        payload
    }

    pub fn baseline(&self) -> Option<&Snapshot> {
        self.baseline.as_ref()
    }

    /// Forgets the baseline, so the next update is sent in full
    pub fn reset(&mut self) {
        self.baseline = None;
    }
}

/// Receiving half of a delta session
#[derive(Debug, Default)]
pub struct BaselineDecoder {
    codec: DeltaCodec,
    baseline: Option<Snapshot>,
}

impl BaselineDecoder {
    pub fn new(codec: DeltaCodec) -> Self {
        Self {
            codec,
            baseline: None,
        }
    }

    /// A failed decode leaves the baseline untouched
    pub fn decode(&mut self, payload: SyncPayload) -> Result<Snapshot, DeltaError> {
        let snapshot = match payload {
            SyncPayload::Full(snapshot) => snapshot,
            SyncPayload::Delta(delta) => {
                let baseline = self.baseline.as_ref().ok_or(DeltaError::MissingBaseline)?;
                self.codec.apply_patch(baseline, &delta)?
            }
        };
        self.baseline = Some(snapshot.clone());
        Ok(snapshot)
    }

    pub fn baseline(&self) -> Option<&Snapshot> {
        self.baseline.as_ref()
    }

    pub fn reset(&mut self) {
        self.baseline = None;
    }
}
