use k256::{ecdsa::SigningKey, elliptic_curve::sec1::ToEncodedPoint, PublicKey};
use sha3::{Digest, Keccak256};

use faucet_types::{Address, TxHash};

use crate::error::FaucetError;
use crate::rlp::{self, Item};

/// Fields of a legacy (pre EIP-2718) transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
    pub chain_id: u64,
}

impl LegacyTransaction {
    fn base_fields(&self) -> Vec<Item<'_>> {
        vec![
            Item::Uint(self.nonce as u128),
            Item::Uint(self.gas_price),
            Item::Uint(self.gas_limit as u128),
            Item::Bytes(self.to.as_bytes()),
            Item::Uint(self.value),
            Item::Bytes(&self.data),
        ]
    }

    /// EIP-155 signing payload: the six fields followed by `chain_id, 0, 0`.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut fields = self.base_fields();
        fields.push(Item::Uint(self.chain_id as u128));
        fields.push(Item::Uint(0));
        fields.push(Item::Uint(0));
        rlp::encode(&Item::List(fields))
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&Keccak256::digest(self.signing_payload()));
        hash
    }
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: TxHash,
    pub v: u64,
    pub r: [u8; 32],
    pub s: [u8; 32],
}

pub struct LocalSigner {
    key: SigningKey,
    address: Address,
}

impl LocalSigner {
    pub fn from_hex(private_key: &str) -> Result<Self, FaucetError> {
        let bytes = hex::decode(private_key.trim().trim_start_matches("0x"))
            .map_err(|_| FaucetError::InvalidKey)?;
        let key = SigningKey::from_slice(&bytes).map_err(|_| FaucetError::InvalidKey)?;
        let address = address_of(&key);
        Ok(Self { key, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn sign(&self, tx: &LegacyTransaction) -> Result<SignedTransaction, FaucetError> {
        let hash = tx.signing_hash();
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&hash)
            .map_err(|e| FaucetError::Signing(e.to_string()))?;

        let v = recovery_id.to_byte() as u64 + tx.chain_id * 2 + 35;
        let signature_bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&signature_bytes[..32]);
        s.copy_from_slice(&signature_bytes[32..]);

        let mut fields = tx.base_fields();
        fields.push(Item::Uint(v as u128));
        fields.push(Item::Bytes(rlp::trim_leading_zeros(&r)));
        fields.push(Item::Bytes(rlp::trim_leading_zeros(&s)));
        let raw = rlp::encode(&Item::List(fields));

        let hash = format!("0x{}", hex::encode(Keccak256::digest(&raw)));
        Ok(SignedTransaction { raw, hash, v, r, s })
    }
}

fn address_of(key: &SigningKey) -> Address {
    let public_key = PublicKey::from(key.verifying_key());
    let encoded_point = public_key.to_encoded_point(false);
    let public_key_bytes = encoded_point.as_bytes();

    let hash = Keccak256::digest(&public_key_bytes[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}
