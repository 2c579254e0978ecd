//! Transport cipher properties over a real handshake.

use rand_core::OsRng;
use xisco::{initiator, responder, Error, KeyPair, Xisco};

/// Run an NK handshake and return the two transport ends.
fn transport_pair() -> (Xisco, Xisco) {
    let bob = KeyPair::generate(&mut OsRng);
    let mut a = initiator::NK::new(bob.public);
    let mut b = responder::NK::new(bob);

    let mut msg1 = Vec::new();
    a.write(&mut msg1).unwrap();
    b.read(&msg1).unwrap();
    let mut msg2 = Vec::new();
    b.write(&mut msg2).unwrap();
    a.read(&msg2).unwrap();

    (a.finalize(), b.finalize())
}

#[test]
fn tamper_aborts_permanently() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"first", None, &mut ct);
    ct[2] ^= 0x04;
    assert_eq!(
        b.decrypt_to_vec(&ct, None).unwrap_err(),
        Error::MessageCorrupted
    );
    assert!(b.is_aborted());
}

#[test]
#[should_panic(expected = "aborted")]
fn decrypt_after_abort_panics() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"first", None, &mut ct);
    ct[2] ^= 0x04;
    let _ = b.decrypt_to_vec(&ct, None);

    let mut good = Vec::new();
    a.encrypt(b"second", None, &mut good);
    let _ = b.decrypt_to_vec(&good, None);
}

#[test]
#[should_panic(expected = "aborted")]
fn encrypt_after_abort_panics() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"first", None, &mut ct);
    ct[2] ^= 0x04;
    let _ = b.decrypt_to_vec(&ct, None);

    b.encrypt(b"reply", None, &mut Vec::new());
}

#[test]
fn out_of_order_delivery_fails() {
    let (mut a, mut b) = transport_pair();

    let mut ct1 = Vec::new();
    let mut ct2 = Vec::new();
    a.encrypt(b"first", None, &mut ct1);
    a.encrypt(b"second", None, &mut ct2);

    // The receiver expects nonce 0, not 1.
    assert_eq!(
        b.decrypt_to_vec(&ct2, None).unwrap_err(),
        Error::MessageCorrupted
    );
}

#[test]
fn replay_fails() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"once", None, &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"once");
    assert_eq!(
        b.decrypt_to_vec(&ct, None).unwrap_err(),
        Error::MessageCorrupted
    );
}

#[test]
fn associated_data_round_trips_and_binds() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"body", Some(b"header"), &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, Some(b"header")).unwrap(), b"body");

    let mut ct = Vec::new();
    a.encrypt(b"body", Some(b"header"), &mut ct);
    assert_eq!(
        b.decrypt_to_vec(&ct, Some(b"other")).unwrap_err(),
        Error::MessageCorrupted
    );
}

#[test]
fn matched_rekey_keeps_the_channel_working() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"before", None, &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"before");

    a.rekey_sender();
    b.rekey_receiver();

    let mut ct = Vec::new();
    a.encrypt(b"after", None, &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"after");
}

#[test]
fn both_lane_rekey_keeps_both_directions_working() {
    let (mut a, mut b) = transport_pair();

    a.rekey();
    b.rekey();

    let mut ct = Vec::new();
    a.encrypt(b"one way", None, &mut ct);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"one way");

    let mut ct = Vec::new();
    b.encrypt(b"the other", None, &mut ct);
    assert_eq!(a.decrypt_to_vec(&ct, None).unwrap(), b"the other");
}

#[test]
fn unilateral_rekey_breaks_the_lane() {
    let (mut a, mut b) = transport_pair();

    a.rekey_sender();

    let mut ct = Vec::new();
    a.encrypt(b"message", None, &mut ct);
    assert_eq!(
        b.decrypt_to_vec(&ct, None).unwrap_err(),
        Error::MessageCorrupted
    );
}

#[test]
fn rekey_does_not_reopen_old_keys() {
    let (mut a, mut b) = transport_pair();

    let mut old = Vec::new();
    a.encrypt(b"recorded earlier", None, &mut old);

    a.rekey_sender();
    b.rekey_receiver();

    assert_eq!(
        b.decrypt_to_vec(&old, None).unwrap_err(),
        Error::MessageCorrupted
    );
}

#[test]
fn empty_message_authenticates() {
    let (mut a, mut b) = transport_pair();

    let mut ct = Vec::new();
    a.encrypt(b"", None, &mut ct);
    assert_eq!(ct.len(), xisco::TAG_LEN);
    assert_eq!(b.decrypt_to_vec(&ct, None).unwrap(), b"");
}
