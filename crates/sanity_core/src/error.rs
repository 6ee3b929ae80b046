use label_model::GeometryKind;
use mask_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// A label of the wrong geometry kind was handed to a checker.
    /// This is an integration error, not a data defect.
    #[error("wrong label type: {found}, expected: {expected}")]
    TypeMismatch {
        expected: GeometryKind,
        found: GeometryKind,
    },
    #[error("bitmap payload of label {label_id} is corrupt: {source}")]
    Codec {
        label_id: u64,
        #[source]
        source: CodecError,
    },
    #[error("rectangle label {0} has fewer than two corner points")]
    MalformedRectangle(u64),
}
