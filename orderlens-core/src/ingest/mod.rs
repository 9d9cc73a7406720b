//! Raw record ingestion: loosely-typed venue records in, canonical orders out.

pub mod normalize;
pub mod raw;
pub mod snapshot;

pub use normalize::{Normalizer, SourceKind};
pub use raw::{Fields, RawRecord};
pub use snapshot::{build_timeline, RawSnapshot, SnapshotError};
