use bitforge::primitives::{Address, PublicKey};
use bitforge::script::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use bitforge::script::{Instruction, Script};

const GENERATOR_COMPRESSED: &str =
    "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

fn p2pkh(address: &Address) -> Script {
    Script::from_instructions(vec![
        Instruction::op(OP_DUP).unwrap(),
        Instruction::op(OP_HASH160).unwrap(),
        Instruction::push(address.public_key_hash().to_vec()).unwrap(),
        Instruction::op(OP_EQUALVERIFY).unwrap(),
        Instruction::op(OP_CHECKSIG).unwrap(),
    ])
}

/// A locking script built from a key's address has the standard layout.
#[test]
fn test_p2pkh_from_public_key() {
    let key = PublicKey::from_hex(GENERATOR_COMPRESSED, "livenet").unwrap();
    let script = p2pkh(&key.to_address());
    assert_eq!(
        script.to_hex(),
        "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac"
    );
    assert_eq!(
        script.to_string(),
        "OP_DUP OP_HASH160 20 0x751e76e8199196d454941c45d1b3a323f1433bd6 OP_EQUALVERIFY OP_CHECKSIG"
    );
}

/// The pushed hash of a decoded script recovers the address.
#[test]
fn test_p2pkh_recover_address() {
    let script = Script::from_hex("76a914751e76e8199196d454941c45d1b3a323f1433bd688ac").unwrap();
    let data = script.instructions()[2].data().unwrap();
    let mut hash = [0u8; 20];
    hash.copy_from_slice(data);
    let network = bitforge::primitives::NetworkParams::livenet();
    let address = Address::from_public_key_hash(hash, network);
    assert_eq!(address.to_string(), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
}
