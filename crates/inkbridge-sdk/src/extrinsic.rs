//! `Contracts::call` extrinsic construction

use inkbridge_primitives::{AccountId32, Balance, Nonce, Weight, H256};
use inkbridge_scale::{Compact, Decode, DecodeAll, Encode};

use crate::config::ContractsPalletConfig;
use crate::connection::RuntimeVersion;
use crate::signer::SignerPayload;
use crate::SdkError;

/// Extrinsic format version
pub const EXTRINSIC_VERSION: u8 = 4;

const SIGNED_FLAG: u8 = 0b1000_0000;
const IMMORTAL_ERA: u8 = 0x00;

/// Account reference resolved by the runtime's lookup
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum MultiAddress {
    /// Plain account id
    Id(AccountId32),
    /// Account index
    Index(#[codec(compact)] u32),
    /// Raw address bytes
    Raw(Vec<u8>),
    /// 32-byte address
    Address32([u8; 32]),
    /// 20-byte address
    Address20([u8; 20]),
}

/// Signature with its scheme tag
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum MultiSignature {
    /// Ed25519
    Ed25519([u8; 64]),
    /// Sr25519
    Sr25519([u8; 64]),
    /// Secp256k1 ECDSA, recoverable
    Ecdsa([u8; 65]),
}

/// A `pallet_contracts::call` dispatchable, without the pallet and call indices
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ContractCall {
    /// Contract account
    pub dest: MultiAddress,
    /// Value transferred with the call
    #[codec(compact)]
    pub value: Balance,
    /// Weight limit
    pub gas_limit: Weight,
    /// Storage deposit limit; `None` means unlimited
    pub storage_deposit_limit: Option<Compact<Balance>>,
    /// Selector and encoded arguments
    pub data: Vec<u8>,
}

impl ContractCall {
    /// Encode as a runtime call for the pallet at `pallet`
    pub fn encode_call(&self, pallet: &ContractsPalletConfig) -> Vec<u8> {
        (pallet.pallet_index, pallet.call_index, self).encode()
    }
}

/// Signature section of a v4 extrinsic
#[derive(Encode)]
struct SignedPrefix<'a> {
    version: u8,
    signer: MultiAddress,
    signature: &'a MultiSignature,
    era: u8,
    #[codec(compact)]
    nonce: Nonce,
    #[codec(compact)]
    tip: Balance,
}

/// Chain state a transaction signature commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningContext {
    /// Sender nonce
    pub nonce: Nonce,
    /// Genesis hash
    pub genesis_hash: H256,
    /// Runtime versions
    pub runtime: RuntimeVersion,
}

/// Build the payload a wallet signs for an immortal, tip-free transaction
pub fn signer_payload(
    address: &str,
    call: &[u8],
    context: &SigningContext,
    signed_extensions: &[String],
) -> SignerPayload {
    let genesis = context.genesis_hash.to_hex();
    SignerPayload {
        address: address.to_string(),
        // immortal transactions checkpoint at genesis
        block_hash: genesis.clone(),
        block_number: format!("0x{:08x}", 0),
        era: format!("0x{:02x}", IMMORTAL_ERA),
        genesis_hash: genesis,
        method: format!("0x{}", hex::encode(call)),
        nonce: format!("0x{:08x}", context.nonce),
        spec_version: format!("0x{:08x}", context.runtime.spec_version),
        tip: format!("0x{:032x}", 0u128),
        transaction_version: format!("0x{:08x}", context.runtime.transaction_version),
        signed_extensions: signed_extensions.to_vec(),
        version: EXTRINSIC_VERSION,
    }
}

/// Parse a wallet signature.
///
/// A bare 64-byte signature is taken as sr25519; anything else must carry its
/// scheme tag.
pub fn multi_signature(signature: &str) -> Result<MultiSignature, SdkError> {
    let raw = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes = hex::decode(raw).map_err(|e| SdkError::SigningFailed(format!("bad signature: {}", e)))?;
    if let Ok(sr25519) = <[u8; 64]>::try_from(bytes.as_slice()) {
        return Ok(MultiSignature::Sr25519(sr25519));
    }
    MultiSignature::decode_all(&mut bytes.as_slice()).map_err(|e| {
        SdkError::SigningFailed(format!("unexpected {}-byte signature: {}", bytes.len(), e))
    })
}

/// Assemble a length-prefixed v4 signed extrinsic for an immortal transaction
pub fn signed_extrinsic(
    sender: &AccountId32,
    signature: &MultiSignature,
    nonce: Nonce,
    tip: Balance,
    call: &[u8],
) -> Vec<u8> {
    let mut body = SignedPrefix {
        version: SIGNED_FLAG | EXTRINSIC_VERSION,
        signer: MultiAddress::Id(*sender),
        signature,
        era: IMMORTAL_ERA,
        nonce,
        tip,
    }
    .encode();
    body.extend_from_slice(call);
    body.encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call() -> ContractCall {
        ContractCall {
            dest: MultiAddress::Id(AccountId32::from_bytes([2; 32])),
            value: 0,
            gas_limit: Weight::from_parts(1, 64),
            storage_deposit_limit: None,
            data: vec![0xaa, 0xbb],
        }
    }

    #[test]
    fn test_contract_call_layout() {
        let encoded = call().encode_call(&ContractsPalletConfig::default());
        assert_eq!(&encoded[..3], &[8, 6, 0]);
        assert_eq!(&encoded[3..35], &[2u8; 32]);
        // value, weight (1, 64), no deposit limit, data
        assert_eq!(&encoded[35..], &[0, 4, 1, 1, 0, 8, 0xaa, 0xbb]);
    }

    #[test]
    fn test_storage_deposit_limit_is_compact() {
        let mut with_limit = call();
        with_limit.storage_deposit_limit = Some(Compact(1));
        let encoded = with_limit.encode_call(&ContractsPalletConfig::default());
        assert_eq!(&encoded[39..41], &[1, 4]);
    }

    #[test]
    fn test_signer_payload_formatting() {
        let context = SigningContext {
            nonce: 3,
            genesis_hash: H256::from_bytes([0x91; 32]),
            runtime: RuntimeVersion {
                spec_version: 100,
                transaction_version: 1,
            },
        };
        let payload = signer_payload("5Grw", &[8, 6], &context, &["CheckNonce".to_string()]);
        assert_eq!(payload.nonce, "0x00000003");
        assert_eq!(payload.spec_version, "0x00000064");
        assert_eq!(payload.method, "0x0806");
        assert_eq!(payload.era, "0x00");
        assert_eq!(payload.block_hash, payload.genesis_hash);
        assert_eq!(payload.tip.len(), 34);
        assert_eq!(payload.version, 4);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["specVersion"], "0x00000064");
        assert_eq!(json["signedExtensions"][0], "CheckNonce");
    }

    #[test]
    fn test_multi_signature() {
        let bare = format!("0x{}", "ab".repeat(64));
        let sig = multi_signature(&bare).unwrap();
        assert_eq!(sig, MultiSignature::Sr25519([0xab; 64]));
        assert_eq!(sig.encode()[0], 0x01);

        let typed = format!("0x00{}", "ab".repeat(64));
        assert_eq!(multi_signature(&typed).unwrap(), MultiSignature::Ed25519([0xab; 64]));

        let ecdsa = format!("0x02{}", "cd".repeat(65));
        assert_eq!(multi_signature(&ecdsa).unwrap(), MultiSignature::Ecdsa([0xcd; 65]));

        assert!(matches!(multi_signature("0x1234"), Err(SdkError::SigningFailed(_))));
        // sr25519 tag with an ecdsa-sized body
        let mismatched = format!("0x01{}", "cd".repeat(65));
        assert!(matches!(multi_signature(&mismatched), Err(SdkError::SigningFailed(_))));
    }

    #[test]
    fn test_signed_extrinsic_layout() {
        let sender = AccountId32::from_bytes([1; 32]);
        let signature = MultiSignature::Sr25519([0x01; 64]);
        let call = [8u8, 6];
        let xt = signed_extrinsic(&sender, &signature, 1, 0, &call);

        let body_len = 1 + 1 + 32 + 65 + 1 + 1 + 1 + 2;
        // 104 needs the two-byte compact form
        assert_eq!(&xt[..2], &[0xa1, 0x01]);
        assert_eq!(xt.len(), 2 + body_len);
        assert_eq!(xt[2], 0x84);
        assert_eq!(xt[3], 0x00);
        assert_eq!(&xt[xt.len() - 5..], &[0x00, 0x04, 0x00, 8, 6]);
    }
}
