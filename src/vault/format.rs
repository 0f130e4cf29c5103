//! The persisted vault document and its mapping to `Vault`.
//!
//! A vault file is a JSON document shaped like this:
//!
//! ```text
//! {
//!   "version": 1,
//!   "kdf": { "memory_kib": .., "iterations": .., "parallelism": .. },
//!   "masterPassword": { "salt": b64, "hash": b64 },
//!   "data": {
//!     "item": [
//!       { "name": "..",
//!         "description": { "iv": b64, "salt": b64, "cipherText": b64 },
//!         "password":    { "iv": b64, "salt": b64, "cipherText": b64 } }
//!     ]
//!   }
//! }
//! ```
//!
//! Every byte value is the standard base64 text of its node.  Loading is
//! all-or-nothing: anything that fails to parse or violates the schema is
//! `VaultCorrupt`, never a partially populated vault.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::entry::{validate_entry_name, Entry};
use super::master::MasterCredential;
use super::model::Vault;
use super::store::VaultStore;
use crate::crypto::encryption::{IV_LEN, TAG_LEN};
use crate::crypto::kdf::{Argon2Params, SALT_LEN};
use crate::crypto::keys::HASH_LEN;
use crate::crypto::EncryptedBlob;
use crate::errors::{Result, TinyPassError};

// ---------------------------------------------------------------------------
// Document tree
// ---------------------------------------------------------------------------

/// Current document format version.
pub const CURRENT_VERSION: u8 = 1;

/// Argon2 parameters stored in the document so the exact same KDF
/// settings are used when re-opening.  If missing, defaults are used
/// (m=64MB, t=3, p=4).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoredArgon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for StoredArgon2Params {
    fn default() -> Self {
        Argon2Params::default().into()
    }
}

impl From<Argon2Params> for StoredArgon2Params {
    fn from(p: Argon2Params) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

impl From<StoredArgon2Params> for Argon2Params {
    fn from(p: StoredArgon2Params) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

/// Root of the vault document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDocument {
    pub version: u8,

    #[serde(default)]
    pub kdf: StoredArgon2Params,

    pub master_password: MasterPasswordNode,

    pub data: DataNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterPasswordNode {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataNode {
    #[serde(default)]
    pub item: Vec<ItemNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemNode {
    pub name: String,
    pub description: BlobNode,
    pub password: BlobNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobNode {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub iv: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub cipher_text: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Vault -> document
// ---------------------------------------------------------------------------

impl From<&EncryptedBlob> for BlobNode {
    fn from(blob: &EncryptedBlob) -> Self {
        Self {
            iv: blob.iv.to_vec(),
            salt: blob.salt.to_vec(),
            cipher_text: blob.ciphertext.clone(),
        }
    }
}

impl TryFrom<&Vault> for VaultDocument {
    type Error = TinyPassError;

    fn try_from(vault: &Vault) -> Result<Self> {
        let master = vault.master().ok_or_else(|| {
            TinyPassError::Serialization("cannot persist a vault without a master credential".into())
        })?;

        let item = vault
            .entries()
            .iter()
            .map(|e| ItemNode {
                name: e.name.clone(),
                description: BlobNode::from(&e.description),
                password: BlobNode::from(&e.password),
            })
            .collect();

        Ok(Self {
            version: CURRENT_VERSION,
            kdf: (*vault.kdf_params()).into(),
            master_password: MasterPasswordNode {
                salt: master.salt().to_vec(),
                hash: master.hash().to_vec(),
            },
            data: DataNode { item },
        })
    }
}

// ---------------------------------------------------------------------------
// document -> Vault
// ---------------------------------------------------------------------------

/// Convert a decoded byte vector into a fixed-size array, or explain why not.
fn fixed<const N: usize>(bytes: Vec<u8>, what: &str) -> Result<[u8; N]> {
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        TinyPassError::VaultCorrupt(format!("{what} must be {N} bytes (got {len})"))
    })
}

impl TryFrom<BlobNode> for EncryptedBlob {
    type Error = TinyPassError;

    fn try_from(node: BlobNode) -> Result<Self> {
        if node.cipher_text.len() < TAG_LEN {
            return Err(TinyPassError::VaultCorrupt(format!(
                "cipherText must be at least {TAG_LEN} bytes (got {})",
                node.cipher_text.len()
            )));
        }
        Ok(Self {
            iv: fixed::<IV_LEN>(node.iv, "iv")?,
            salt: fixed::<SALT_LEN>(node.salt, "salt")?,
            ciphertext: node.cipher_text,
        })
    }
}

impl TryFrom<VaultDocument> for Vault {
    type Error = TinyPassError;

    fn try_from(doc: VaultDocument) -> Result<Self> {
        if doc.version != CURRENT_VERSION {
            return Err(TinyPassError::VaultCorrupt(format!(
                "unsupported version {}, expected {CURRENT_VERSION}",
                doc.version
            )));
        }

        let kdf = Argon2Params::from(doc.kdf);
        kdf.validate()
            .map_err(|e| TinyPassError::VaultCorrupt(format!("kdf: {e}")))?;

        let master = MasterCredential::from_parts(
            fixed::<SALT_LEN>(doc.master_password.salt, "masterPassword salt")?,
            fixed::<HASH_LEN>(doc.master_password.hash, "masterPassword hash")?,
        );

        let entries = doc
            .data
            .item
            .into_iter()
            .map(|item| -> Result<Entry> {
                validate_entry_name(&item.name)
                    .map_err(|e| TinyPassError::VaultCorrupt(e.to_string()))?;
                Ok(Entry {
                    description: item.description.try_into()?,
                    password: item.password.try_into()?,
                    name: item.name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Vault::from_parts(kdf, master, entries).map_err(|e| match e {
            TinyPassError::DuplicateName(name) => {
                TinyPassError::VaultCorrupt(format!("duplicate entry name '{name}'"))
            }
            other => other,
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse raw bytes into a document tree.
pub fn parse_document(bytes: &[u8]) -> Result<VaultDocument> {
    serde_json::from_slice(bytes).map_err(|e| TinyPassError::VaultCorrupt(format!("document: {e}")))
}

/// Serialize a document tree to pretty-printed JSON.
pub fn serialize_document(doc: &VaultDocument) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(doc).map_err(|e| TinyPassError::Serialization(format!("document: {e}")))
}

/// Decode a complete vault from bytes.
pub fn decode_vault(bytes: &[u8]) -> Result<Vault> {
    parse_document(bytes)?.try_into()
}

/// Encode a vault to bytes.
pub fn encode_vault(vault: &Vault) -> Result<Vec<u8>> {
    serialize_document(&VaultDocument::try_from(vault)?)
}

/// Read and decode the vault held by `store`.
pub fn load_vault<S: VaultStore + ?Sized>(store: &S) -> Result<Vault> {
    let bytes = store.read()?;
    let vault = decode_vault(&bytes)?;
    debug!(entries = vault.len(), "vault document loaded");
    Ok(vault)
}

/// Encode `vault` and hand it to `store` for an atomic write.
pub fn save_vault<S: VaultStore + ?Sized>(store: &mut S, vault: &Vault) -> Result<()> {
    let bytes = encode_vault(vault)?;
    store.write(&bytes)?;
    debug!(entries = vault.len(), bytes = bytes.len(), "vault document saved");
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::{MAX_MEMORY_KIB, MIN_MEMORY_KIB};

    fn sample_vault() -> Vault {
        let master = MasterCredential::from_parts([1u8; SALT_LEN], [2u8; HASH_LEN]);
        let blob = EncryptedBlob {
            iv: [3u8; IV_LEN],
            salt: [4u8; SALT_LEN],
            ciphertext: vec![5u8; TAG_LEN + 3],
        };
        let entry = Entry {
            name: "github".into(),
            description: blob.clone(),
            password: blob,
        };
        Vault::from_parts(Argon2Params::MINIMUM, master, vec![entry]).unwrap()
    }

    #[test]
    fn document_uses_tree_node_names() {
        let bytes = encode_vault(&sample_vault()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["version"], 1);
        assert_eq!(json["masterPassword"]["salt"], BASE64.encode([1u8; SALT_LEN]));
        assert_eq!(json["masterPassword"]["hash"], BASE64.encode([2u8; HASH_LEN]));

        let item = &json["data"]["item"][0];
        assert_eq!(item["name"], "github");
        assert_eq!(item["description"]["iv"], BASE64.encode([3u8; IV_LEN]));
        assert_eq!(item["password"]["salt"], BASE64.encode([4u8; SALT_LEN]));
        assert_eq!(
            item["password"]["cipherText"],
            BASE64.encode(vec![5u8; TAG_LEN + 3])
        );
    }

    #[test]
    fn decode_restores_identical_vault() {
        let vault = sample_vault();
        let decoded = decode_vault(&encode_vault(&vault).unwrap()).unwrap();
        assert_eq!(decoded, vault);
    }

    #[test]
    fn uninitialized_vault_cannot_be_encoded() {
        let vault = Vault::empty(Argon2Params::MINIMUM);
        assert!(matches!(
            encode_vault(&vault),
            Err(TinyPassError::Serialization(_))
        ));
    }

    #[test]
    fn missing_kdf_node_uses_defaults() {
        let doc = serde_json::json!({
            "version": 1,
            "masterPassword": {
                "salt": BASE64.encode([1u8; SALT_LEN]),
                "hash": BASE64.encode([2u8; HASH_LEN]),
            },
            "data": {}
        });
        let vault = decode_vault(doc.to_string().as_bytes()).unwrap();
        assert_eq!(*vault.kdf_params(), Argon2Params::default());
        assert!(vault.is_empty());
    }

    /// Decode `sample_vault()` with its stored `kdf` node swapped out.
    fn decode_with_kdf(kdf: StoredArgon2Params) -> Result<Vault> {
        let mut doc = VaultDocument::try_from(&sample_vault()).unwrap();
        doc.kdf = kdf;
        decode_vault(&serialize_document(&doc).unwrap())
    }

    #[test]
    fn too_weak_kdf_node_is_corrupt() {
        let weak = StoredArgon2Params {
            memory_kib: MIN_MEMORY_KIB - 1,
            iterations: 1,
            parallelism: 1,
        };
        assert!(matches!(
            decode_with_kdf(weak),
            Err(TinyPassError::VaultCorrupt(_))
        ));
    }

    #[test]
    fn oversized_kdf_node_is_corrupt() {
        // Decoding never hashes, so these return immediately instead of
        // trying to allocate the requested memory.
        let oversized = [
            StoredArgon2Params {
                memory_kib: u32::MAX,
                iterations: 1,
                parallelism: 1,
            },
            StoredArgon2Params {
                memory_kib: MAX_MEMORY_KIB + 1,
                iterations: 1,
                parallelism: 1,
            },
            StoredArgon2Params {
                memory_kib: MIN_MEMORY_KIB,
                iterations: u32::MAX,
                parallelism: 1,
            },
            StoredArgon2Params {
                memory_kib: MIN_MEMORY_KIB,
                iterations: 1,
                parallelism: u32::MAX,
            },
        ];
        for kdf in oversized {
            assert!(
                matches!(decode_with_kdf(kdf), Err(TinyPassError::VaultCorrupt(_))),
                "{kdf:?} should be corrupt"
            );
        }
    }

    #[test]
    fn wrong_lengths_are_corrupt() {
        let mut doc = VaultDocument::try_from(&sample_vault()).unwrap();
        doc.data.item[0].description.iv.pop();
        let bytes = serialize_document(&doc).unwrap();
        assert!(matches!(
            decode_vault(&bytes),
            Err(TinyPassError::VaultCorrupt(_))
        ));
    }

    #[test]
    fn duplicate_names_are_corrupt() {
        let mut doc = VaultDocument::try_from(&sample_vault()).unwrap();
        let copy = doc.data.item[0].clone();
        doc.data.item.push(copy);
        let bytes = serialize_document(&doc).unwrap();
        assert!(matches!(
            decode_vault(&bytes),
            Err(TinyPassError::VaultCorrupt(_))
        ));
    }

    #[test]
    fn unknown_version_is_corrupt() {
        let mut doc = VaultDocument::try_from(&sample_vault()).unwrap();
        doc.version = 9;
        let bytes = serialize_document(&doc).unwrap();
        assert!(matches!(
            decode_vault(&bytes),
            Err(TinyPassError::VaultCorrupt(_))
        ));
    }
}
