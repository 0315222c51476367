//! Split glTF and single-file GLB writers

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"
const HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

fn chunk_length(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| Error::InvalidArgument(format!("GLB chunk of {len} bytes exceeds 4 GiB")))
}

/// Assemble a GLB container
///
/// The JSON chunk is padded with spaces and the binary chunk with zeros. The
/// binary chunk is always present, empty when the document has no buffer data.
pub fn to_glb(json: &[u8], bin: &[u8]) -> Result<Vec<u8>> {
    let json_padding = padding(json.len());
    let bin_padding = padding(bin.len());
    let total = HEADER_SIZE
        + CHUNK_HEADER_SIZE
        + json.len()
        + json_padding
        + CHUNK_HEADER_SIZE
        + bin.len()
        + bin_padding;

    let mut out = Vec::with_capacity(total);

    // Header
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&chunk_length(total)?.to_le_bytes());

    // JSON chunk
    out.extend_from_slice(&chunk_length(json.len() + json_padding)?.to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(json);
    out.resize(out.len() + json_padding, b' ');

    // BIN chunk
    out.extend_from_slice(&chunk_length(bin.len() + bin_padding)?.to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(bin);
    out.resize(out.len() + bin_padding, 0);

    debug_assert_eq!(out.len(), total);
    Ok(out)
}

/// Write through a sibling temporary file renamed into place
///
/// A failed write leaves at most the temporary file behind, never a truncated
/// file under the final name.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    if let Err(err) = fs::write(&temp, bytes).and_then(|()| fs::rename(&temp, path)) {
        let _ = fs::remove_file(&temp);
        return Err(err.into());
    }
    Ok(())
}

/// `<name>.gltf` plus `<name>.bin`; returns the written paths
pub fn write_split(dir: &Path, name: &str, json: &[u8], bin: &[u8]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(2);
    if !bin.is_empty() {
        let bin_path = dir.join(format!("{name}.bin"));
        write_atomic(&bin_path, bin)?;
        written.push(bin_path);
    }
    let gltf_path = dir.join(format!("{name}.gltf"));
    write_atomic(&gltf_path, json)?;
    written.push(gltf_path);
    Ok(written)
}

pub fn write_glb(dir: &Path, name: &str, json: &[u8], bin: &[u8]) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.glb"));
    write_atomic(&path, &to_glb(json, bin)?)?;
    Ok(path)
}
