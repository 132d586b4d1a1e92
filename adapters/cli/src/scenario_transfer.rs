//! Single-line scenario encoding for sharing setups between users.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use bw4t_system_layout::{world_size, LayoutConfig};
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "bw4t";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded scenario payload.
pub(crate) const TRANSFER_HEADER: &str = "bw4t:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the scenario into a single-line string suitable for clipboard
/// transfer. The header carries the world dimensions the scenario produces
/// so recipients can sanity-check what they are about to load.
pub(crate) fn encode(config: &LayoutConfig) -> String {
    let json = serde_json::to_vec(config).expect("scenario serialization never fails");
    let payload = STANDARD_NO_PAD.encode(json);
    let (columns, rows) = world_size(config);
    format!("{TRANSFER_HEADER}{FIELD_DELIMITER}{columns}x{rows}{FIELD_DELIMITER}{payload}")
}

/// Decodes a scenario from the provided string representation.
pub(crate) fn decode(value: &str) -> Result<LayoutConfig, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TransferError::InvalidEncoding)?;
    let config: LayoutConfig =
        serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;

    // The advertised dimensions must match what the scenario really builds.
    if world_size(&config) != (columns, rows) {
        return Err(TransferError::DimensionMismatch {
            advertised: (columns, rows),
            actual: world_size(&config),
        });
    }

    Ok(config)
}

/// Errors that can occur while decoding scenario transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("scenario string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded scenario.
    #[error("scenario string is missing the prefix")]
    MissingPrefix,
    /// The encoded scenario did not contain a version segment.
    #[error("scenario string is missing the version")]
    MissingVersion,
    /// The encoded scenario did not include grid dimensions.
    #[error("scenario string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded scenario did not include the payload segment.
    #[error("scenario string is missing the payload")]
    MissingPayload,
    /// The encoded scenario used an unexpected prefix segment.
    #[error("scenario prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded scenario used an unsupported version identifier.
    #[error("scenario version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded scenario.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The advertised dimensions disagree with the decoded scenario.
    #[error("scenario advertises a {}x{} world but builds {}x{}",
        advertised.0, advertised.1, actual.0, actual.1)]
    DimensionMismatch {
        /// Dimensions carried in the header.
        advertised: (u32, u32),
        /// Dimensions the decoded configuration produces.
        actual: (u32, u32),
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode scenario payload: {0}")]
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse scenario payload: {0}")]
    InvalidPayload(serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), TransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| TransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| TransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| TransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(TransferError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_default_scenario() {
        let config = LayoutConfig::default();
        let encoded = encode(&config);
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:21x14:")));

        let decoded = decode(&encoded).expect("scenario decodes");
        assert_eq!(config, decoded);
    }

    #[test]
    fn round_trip_customised_scenario() {
        let config = LayoutConfig {
            room_count: 6,
            rooms_per_row: 3,
            drop_zone_count: 2,
            seed: 99,
            ..LayoutConfig::default()
        };

        let decoded = decode(&encode(&config)).expect("scenario decodes");
        assert_eq!(config, decoded);
    }

    #[test]
    fn foreign_prefixes_are_rejected() {
        let encoded = encode(&LayoutConfig::default());
        let tampered = encoded.replacen("bw4t", "maze", 1);
        assert!(matches!(
            decode(&tampered),
            Err(TransferError::InvalidPrefix(_)),
        ));
    }

    #[test]
    fn advertised_dimensions_must_match() {
        let encoded = encode(&LayoutConfig::default());
        let tampered = encoded.replacen("21x14", "30x30", 1);
        assert!(matches!(
            decode(&tampered),
            Err(TransferError::DimensionMismatch { .. }),
        ));
    }

    #[test]
    fn truncated_strings_are_rejected() {
        assert!(matches!(decode("   "), Err(TransferError::EmptyPayload)));
        assert!(matches!(
            decode("bw4t:v1"),
            Err(TransferError::MissingDimensions),
        ));
        assert!(matches!(
            decode("bw4t:v2:21x14:abc"),
            Err(TransferError::UnsupportedVersion(_)),
        ));
        assert!(matches!(
            decode("bw4t:v1:21x14:!!!"),
            Err(TransferError::InvalidEncoding(_)),
        ));
    }
}
