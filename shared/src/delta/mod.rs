mod baseline;
mod codec;
mod error;
mod snapshot;

pub use baseline::{BaselineDecoder, BaselineEncoder, SyncPayload};
pub use codec::{apply_patch, compute_delta, DeltaCodec};
pub use error::DeltaError;
pub use snapshot::{Delta, Snapshot};
