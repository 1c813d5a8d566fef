use faucet_types::{gas::NATIVE_TRANSFER_GAS_LIMIT, Address};

/// `keccak256("transfer(address,uint256)")[..4]`
pub const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

fn word_from_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

fn word_from_u128(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Overlay registration payload: the address left-padded to one word.
pub fn overlay_calldata(address: &Address) -> Vec<u8> {
    word_from_address(address).to_vec()
}

pub fn erc20_transfer_calldata(to: &Address, amount: u128) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&ERC20_TRANSFER_SELECTOR);
    data.extend_from_slice(&word_from_address(to));
    data.extend_from_slice(&word_from_u128(amount));
    data
}

/// Gas charged for a plain transaction carrying `data`.
pub fn intrinsic_gas(data: &[u8]) -> u64 {
    data.iter().fold(NATIVE_TRANSFER_GAS_LIMIT, |gas, &byte| {
        gas + if byte == 0 { 4 } else { 16 }
    })
}
