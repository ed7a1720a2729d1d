//! # Container Framing
//!
//! Schema units may be shipped either as a raw `FileDescriptorSet` payload
//! or wrapped in a small container:
//!
//! ```text
//! +-----------------+----------------------+-----------------+-------------+
//! | magic (8 ASCII) | index len N (u32 LE) | index block (N) | payload ... |
//! +-----------------+----------------------+-----------------+-------------+
//! ```
//!
//! The index block is produced by the bundling pipeline and is not
//! interpreted here. When the first eight bytes do not match the magic tag
//! the whole buffer is the payload, so framed and raw inputs are handled
//! transparently.

use crate::error::SchemaError;

/// Magic tag opening a framed schema unit.
pub const CONTAINER_MAGIC: &[u8; 8] = b"VALDIPRO";

/// Size of the fixed header: magic tag plus the index length.
pub const CONTAINER_HEADER_LEN: usize = 12;

/// A parsed view over a possibly-framed schema buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    index: Option<&'a [u8]>,
    payload: &'a [u8],
}

impl<'a> Container<'a> {
    /// Split a buffer into its (optional) index block and schema payload.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MalformedSchema` if the buffer starts with the
    /// magic tag but is too short to hold the header, or if the declared
    /// index length runs past the end of the buffer.
    pub fn parse(buffer: &'a [u8]) -> Result<Self, SchemaError> {
        if !buffer.starts_with(CONTAINER_MAGIC) {
            return Ok(Self {
                index: None,
                payload: buffer,
            });
        }

        let len_bytes: [u8; 4] = buffer
            .get(8..CONTAINER_HEADER_LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                SchemaError::MalformedSchema(format!(
                    "framed buffer of {} bytes is shorter than the {CONTAINER_HEADER_LEN}-byte header",
                    buffer.len()
                ))
            })?;
        let index_len = u32::from_le_bytes(len_bytes) as usize;

        let payload_start = CONTAINER_HEADER_LEN
            .checked_add(index_len)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| {
                SchemaError::MalformedSchema(format!(
                    "index block of {index_len} bytes overruns framed buffer of {} bytes",
                    buffer.len()
                ))
            })?;

        Ok(Self {
            index: Some(&buffer[CONTAINER_HEADER_LEN..payload_start]),
            payload: &buffer[payload_start..],
        })
    }

    /// True if the buffer carried the container header.
    pub fn is_framed(&self) -> bool {
        self.index.is_some()
    }

    /// The opaque index block, if the buffer was framed.
    pub fn index(&self) -> Option<&'a [u8]> {
        self.index
    }

    /// The embedded schema payload.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

/// Return the schema payload of a possibly-framed buffer.
pub fn strip_container(buffer: &[u8]) -> Result<&[u8], SchemaError> {
    Container::parse(buffer).map(|c| c.payload())
}

/// Wrap a schema payload and index block in the container header.
///
/// # Errors
///
/// Returns `SchemaError::MalformedSchema` if the index block does not fit
/// in a 32-bit length.
pub fn frame_payload(index: &[u8], payload: &[u8]) -> Result<Vec<u8>, SchemaError> {
    let index_len = u32::try_from(index.len()).map_err(|_| {
        SchemaError::MalformedSchema(format!("index block of {} bytes is too large", index.len()))
    })?;
    let mut out = Vec::with_capacity(CONTAINER_HEADER_LEN + index.len() + payload.len());
    out.extend_from_slice(CONTAINER_MAGIC);
    out.extend_from_slice(&index_len.to_le_bytes());
    out.extend_from_slice(index);
    out.extend_from_slice(payload);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_buffer_passes_through() {
        let raw = b"\x0a\x05hello";
        let c = Container::parse(raw).unwrap();
        assert!(!c.is_framed());
        assert_eq!(c.payload(), raw);
    }

    #[test]
    fn short_buffer_passes_through() {
        let raw = b"VALDI";
        assert_eq!(strip_container(raw).unwrap(), raw);
        assert_eq!(strip_container(&[]).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn non_matching_prefix_skips_nothing() {
        let raw = b"NOTMAGIC\x03\x00\x00\x00abcpayload";
        assert_eq!(strip_container(raw).unwrap(), raw);
    }

    #[test]
    fn framed_buffer_yields_index_and_payload() {
        let framed = frame_payload(b"idx", b"payload").unwrap();
        assert_eq!(&framed[..8], CONTAINER_MAGIC);
        assert_eq!(&framed[8..12], &[3u8, 0, 0, 0]);

        let c = Container::parse(&framed).unwrap();
        assert!(c.is_framed());
        assert_eq!(c.index(), Some(&b"idx"[..]));
        assert_eq!(c.payload(), b"payload");
    }

    #[test]
    fn framed_buffer_with_empty_index() {
        let framed = frame_payload(&[], b"xyz").unwrap();
        assert_eq!(framed.len(), CONTAINER_HEADER_LEN + 3);
        assert_eq!(strip_container(&framed).unwrap(), b"xyz");
    }

    #[test]
    fn truncated_header_is_malformed() {
        let err = Container::parse(b"VALDIPRO\x01\x00").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSchema(_)));
    }

    #[test]
    fn overrunning_index_is_malformed() {
        let mut framed = CONTAINER_MAGIC.to_vec();
        framed.extend_from_slice(&100u32.to_le_bytes());
        framed.extend_from_slice(b"short");
        let err = strip_container(&framed).unwrap_err();
        assert!(matches!(err, SchemaError::MalformedSchema(_)));
    }

    #[test]
    fn maximal_index_length_does_not_overflow() {
        let mut framed = CONTAINER_MAGIC.to_vec();
        framed.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(strip_container(&framed).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Framing then stripping returns the original payload.
        #[test]
        fn strip_inverts_frame(
            index in prop::collection::vec(any::<u8>(), 0..64),
            payload in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let framed = frame_payload(&index, &payload).unwrap();
            let c = Container::parse(&framed).unwrap();
            prop_assert_eq!(c.index(), Some(index.as_slice()));
            prop_assert_eq!(c.payload(), payload.as_slice());
        }

        /// Buffers that do not open with the magic tag are returned whole.
        #[test]
        fn unframed_buffers_are_untouched(buf in prop::collection::vec(any::<u8>(), 0..128)) {
            prop_assume!(!buf.starts_with(CONTAINER_MAGIC));
            prop_assert_eq!(strip_container(&buf).unwrap(), buf.as_slice());
        }
    }
}
