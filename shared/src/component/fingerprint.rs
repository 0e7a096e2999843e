//! Order-sensitive FNV-1a digest over the component name list.
//!
//! The version tag is folded in first so that a future change to the
//! digest itself cannot collide with an old fingerprint.

pub const FINGERPRINT_VERSION_TAG: &str = "ComponentTypesChecksum.v1";

const FNV1A_OFFSET: u64 = 14695981039346656037;
const FNV1A_PRIME: u64 = 1099511628211;

const fn fnv1a_step(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV1A_PRIME)
}

const fn fnv1a_append(mut hash: u64, text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        hash = fnv1a_step(hash, bytes[i]);
        i += 1;
    }
    hash
}

/// Fingerprint of an ordered list of component names. Usable in `const`
/// items so a build can pin the value it was reviewed against:
///
/// ```
/// # use snapwire_shared::schema_fingerprint;
/// const SCHEMA: u64 = schema_fingerprint(&["Transform", "HasName"]);
/// assert_ne!(SCHEMA, schema_fingerprint(&["HasName", "Transform"]));
/// ```
pub const fn schema_fingerprint(names: &[&str]) -> u64 {
    let mut hash = FNV1A_OFFSET;
    hash = fnv1a_append(hash, FINGERPRINT_VERSION_TAG);
    hash = fnv1a_step(hash, 0);
    let mut i = 0;
    while i < names.len() {
        hash = fnv1a_append(hash, names[i]);
        hash = fnv1a_step(hash, 0);
        i += 1;
    }
    hash
}
