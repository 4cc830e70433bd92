//! MOIC matrix codec: row-major f64 little-endian, zstd-compressed.

use vintage_core::constants::{MATRIX_CODEC_ZSTD, MATRIX_LAYOUT_ROW_MAJOR_F64LE};
use vintage_core::errors::CacheError;
use vintage_core::models::MatrixPayload;
use vintage_core::{VintageError, VintageResult};
use vintage_engine::MoicGrid;

const ZSTD_LEVEL: i32 = 3;

/// Encode a generated grid into a persistable payload.
pub fn encode_moic_matrix(grid: &MoicGrid) -> VintageResult<MatrixPayload> {
    let raw: Vec<u8> = grid.values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let compressed = zstd::encode_all(raw.as_slice(), ZSTD_LEVEL)
        .map_err(|e| codec_err(format!("zstd encode: {e}")))?;

    Ok(MatrixPayload {
        moic_matrix: compressed,
        scenario_states: grid.scenario_states.clone(),
        bucket_params: grid.bucket_params.clone(),
        compression_codec: MATRIX_CODEC_ZSTD.to_string(),
        matrix_layout: MATRIX_LAYOUT_ROW_MAJOR_F64LE.to_string(),
        bucket_count: grid.bucket_count,
        optimal_scenario_count: grid.optimal_scenario_count,
    })
}

/// Decode a payload's binary buffer back into row-major cell values.
pub fn decode_moic_matrix(payload: &MatrixPayload) -> VintageResult<Vec<f64>> {
    if payload.compression_codec != MATRIX_CODEC_ZSTD {
        return Err(codec_err(format!(
            "unsupported codec '{}'",
            payload.compression_codec
        )));
    }
    if payload.matrix_layout != MATRIX_LAYOUT_ROW_MAJOR_F64LE {
        return Err(codec_err(format!(
            "unsupported layout '{}'",
            payload.matrix_layout
        )));
    }
    let raw = zstd::decode_all(payload.moic_matrix.as_slice())
        .map_err(|e| codec_err(format!("zstd decode: {e}")))?;
    if raw.len() % 8 != 0 {
        return Err(codec_err(format!("buffer length {} is not f64-aligned", raw.len())));
    }
    Ok(raw
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect())
}

fn codec_err(reason: String) -> VintageError {
    VintageError::Cache(CacheError::Codec { reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid() -> MoicGrid {
        MoicGrid {
            scenario_count: 4,
            bucket_count: 2,
            values: vec![0.0, 0.5, 1.0, 1.5, 2.25, 3.75, 10.0, 42.5],
            scenario_states: json!([{"index": 0}]),
            bucket_params: json!({"buckets": []}),
            optimal_scenario_count: 4,
        }
    }

    #[test]
    fn roundtrip_is_lossless() {
        let grid = grid();
        let payload = encode_moic_matrix(&grid).unwrap();
        assert_eq!(payload.compression_codec, "zstd");
        assert_eq!(payload.matrix_layout, "row-major-f64le");
        assert_eq!(payload.bucket_count, 2);
        let decoded = decode_moic_matrix(&payload).unwrap();
        assert_eq!(decoded, grid.values);
    }

    #[test]
    fn unknown_codec_is_rejected() {
        let mut payload = encode_moic_matrix(&grid()).unwrap();
        payload.compression_codec = "lz4".into();
        assert!(decode_moic_matrix(&payload).is_err());
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let mut payload = encode_moic_matrix(&grid()).unwrap();
        let mut raw = zstd::decode_all(payload.moic_matrix.as_slice()).unwrap();
        raw.pop();
        payload.moic_matrix = zstd::encode_all(raw.as_slice(), 3).unwrap();
        assert!(decode_moic_matrix(&payload).is_err());
    }
}
