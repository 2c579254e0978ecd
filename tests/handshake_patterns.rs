//! End-to-end runs of all nine handshake patterns.

use rand_core::OsRng;
use xisco::{initiator, responder, Error, KeyPair, Xisco, TAG_LEN};

const PLAIN_KEY: usize = 32;
const PLAIN_AND_SEALED_KEY: usize = 80;
const SEALED_KEY: usize = 48;

fn keypair() -> KeyPair {
    KeyPair::generate(&mut OsRng)
}

/// Exchange transport messages in both directions and both orderings.
fn greet(mut a: Xisco, mut b: Xisco) {
    let mut ct = Vec::new();
    a.encrypt(b"Lorem", None, &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"Lorem");

    let mut ct = Vec::new();
    b.encrypt(b"ipsum", None, &mut ct);
    assert_eq!(a.decrypt_to_vec(&ct, None).unwrap(), b"ipsum");

    let mut ct = Vec::new();
    b.encrypt(b"dolor", None, &mut ct);
    assert_eq!(a.decrypt_to_vec(&ct, None).unwrap(), b"dolor");

    let mut ct = Vec::new();
    a.encrypt(b"sit", None, &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"sit");
}

#[test]
fn k() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::K::new(alice.clone(), bob.public);
    let mut b = responder::K::new(bob, alice.public);

    let mut msg = Vec::new();
    a.write(&mut msg).unwrap();
    assert_eq!(msg.len(), PLAIN_KEY);
    b.read(&msg).unwrap();

    greet(a.finalize(), b.finalize());
}

#[test]
fn n() {
    let bob = keypair();
    let mut a = initiator::N::new(bob.public);
    let mut b = responder::N::new(bob);

    let mut msg = Vec::new();
    a.write(&mut msg).unwrap();
    assert_eq!(msg.len(), PLAIN_KEY);
    b.read(&msg).unwrap();

    greet(a.finalize(), b.finalize());
}

#[test]
fn x() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::X::new(alice.clone(), bob.public);
    let mut b = responder::X::new(bob);

    let mut msg = Vec::new();
    a.write(&mut msg).unwrap();
    assert_eq!(msg.len(), PLAIN_AND_SEALED_KEY);
    b.read(&msg).unwrap();
    assert_eq!(b.remote_static(), Some(&alice.public));

    greet(a.finalize(), b.finalize());
}

#[test]
fn nnpsk2() {
    let mut a = initiator::NNpsk2::new(b"our shared secret");
    let mut b = responder::NNpsk2::new(b"our shared secret");

    let mut msg1 = Vec::new();
    a.write(&mut msg1);
    assert_eq!(msg1.len(), PLAIN_KEY);
    b.read(&msg1).unwrap();

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    assert_eq!(msg2.len(), PLAIN_KEY);
    a.read(&msg2).unwrap();

    greet(a.finalize(), b.finalize());
}

#[test]
fn nnpsk2_mismatched_psks_never_converge() {
    let mut a = initiator::NNpsk2::new(b"our shared secret");
    let mut b = responder::NNpsk2::new(b"a different secret");

    let mut msg1 = Vec::new();
    a.write(&mut msg1);
    b.read(&msg1).unwrap();
    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    a.read(&msg2).unwrap();

    // Neither handshake message carries a tag, so the divergence only
    // surfaces on the first transport message.
    let mut at = a.finalize();
    let mut bt = b.finalize();
    let mut ct = Vec::new();
    at.encrypt(b"Lorem", None, &mut ct);
    assert_eq!(
        bt.decrypt_to_vec(&ct, None).unwrap_err(),
        Error::MessageCorrupted
    );
}

#[test]
fn kk() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::KK::new(alice.clone(), bob.public);
    let mut b = responder::KK::new(bob, alice.public);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    assert_eq!(msg1.len(), PLAIN_KEY);
    b.read(&msg1).unwrap();

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    assert_eq!(msg2.len(), PLAIN_KEY);
    a.read(&msg2).unwrap();

    greet(a.finalize(), b.finalize());
}

#[test]
fn nk() {
    let bob = keypair();
    let mut a = initiator::NK::new(bob.public);
    let mut b = responder::NK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    b.read(&msg1).unwrap();

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    a.read(&msg2).unwrap();

    greet(a.finalize(), b.finalize());
}

#[test]
fn nx() {
    let bob = keypair();
    let mut a = initiator::NX::new();
    let mut b = responder::NX::new(bob.clone());

    let mut msg1 = Vec::new();
    a.write(&mut msg1);
    assert_eq!(msg1.len(), PLAIN_KEY);
    b.read(&msg1).unwrap();

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    assert_eq!(msg2.len(), PLAIN_AND_SEALED_KEY);
    a.read(&msg2).unwrap();
    assert_eq!(a.remote_static(), Some(&bob.public));

    greet(a.finalize(), b.finalize());
}

#[test]
fn xx() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::XX::new(alice.clone());
    let mut b = responder::XX::new(bob.clone());

    let mut msg1 = Vec::new();
    a.first_write(&mut msg1);
    assert_eq!(msg1.len(), PLAIN_KEY);
    b.first_read(&msg1).unwrap();

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    assert_eq!(msg2.len(), PLAIN_AND_SEALED_KEY);
    a.read(&msg2).unwrap();
    assert_eq!(a.remote_static(), Some(&bob.public));

    let mut msg3 = Vec::new();
    a.second_write(&mut msg3).unwrap();
    assert_eq!(msg3.len(), SEALED_KEY);
    b.second_read(&msg3).unwrap();
    assert_eq!(b.remote_static(), Some(&alice.public));

    greet(a.finalize(), b.finalize());
}

#[test]
fn ik() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::IK::new(alice.clone(), bob.public);
    let mut b = responder::IK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    assert_eq!(msg1.len(), PLAIN_AND_SEALED_KEY);
    b.read(&msg1).unwrap();
    assert_eq!(b.remote_static(), Some(&alice.public));

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    assert_eq!(msg2.len(), PLAIN_KEY);
    a.read(&msg2).unwrap();

    greet(a.finalize(), b.finalize());
}

#[test]
fn handshake_payloads_round_trip() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::IK::new(alice, bob.public);
    let mut b = responder::IK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    a.encrypt_payload(b"early data", &mut msg1);
    assert_eq!(msg1.len(), PLAIN_AND_SEALED_KEY + 10 + TAG_LEN);
    b.read(&msg1).unwrap();
    assert_eq!(b.decrypt_payload(&msg1).unwrap(), b"early data");

    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    b.encrypt_payload(b"welcome", &mut msg2);
    a.read(&msg2).unwrap();
    assert_eq!(a.decrypt_payload(&msg2).unwrap(), b"welcome");

    greet(a.finalize(), b.finalize());
}

#[test]
fn xx_final_payload_sits_after_the_sealed_key() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::XX::new(alice);
    let mut b = responder::XX::new(bob);

    let mut msg1 = Vec::new();
    a.first_write(&mut msg1);
    b.first_read(&msg1).unwrap();
    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    a.read(&msg2).unwrap();

    let mut msg3 = Vec::new();
    a.second_write(&mut msg3).unwrap();
    a.encrypt_payload(b"payload", &mut msg3);
    assert_eq!(msg3.len(), SEALED_KEY + 7 + TAG_LEN);
    b.second_read(&msg3).unwrap();
    assert_eq!(b.decrypt_payload(&msg3).unwrap(), b"payload");

    greet(a.finalize(), b.finalize());
}

#[test]
fn different_patterns_never_interoperate() {
    // X and IK message 1 have the same shape, but the transcripts start
    // from different ids, so the sealed static key fails to open.
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::X::new(alice, bob.public);
    let mut b = responder::IK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    assert_eq!(b.read(&msg1).unwrap_err(), Error::MessageCorrupted);
}

#[test]
fn wrong_responder_key_fails_to_open_sealed_static() {
    let alice = keypair();
    let bob = keypair();
    let mut a = initiator::IK::new(alice, keypair().public);
    let mut b = responder::IK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    assert_eq!(b.read(&msg1).unwrap_err(), Error::MessageCorrupted);
}

#[test]
fn truncated_message_is_rejected() {
    let bob = keypair();
    let mut a = initiator::NK::new(bob.public);
    let mut b = responder::NK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    assert_eq!(
        b.read(&msg1[..PLAIN_KEY - 1]).unwrap_err(),
        Error::CiphertextTooShort
    );
}
