//! Initiator-side pattern state machines.

use rand_core::OsRng;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::keys::{KeyPair, PublicKey};
use crate::transport::Xisco;

use super::{
    delegate_driver, Driver, Role, PLAIN_AND_SEALED_KEY, PLAIN_KEY, SEALED_KEY,
};

// K:
//  -> s
//  <- s
//  ...
//  -> e, es, ss

/// One-way handshake where both static keys are known a priori.
pub struct K {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    rs: PublicKey,
}

impl K {
    pub fn new(my_static: KeyPair, their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "K"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        self.driver.mix_key(self.s.dh(&self.rs)?);
        Ok(())
    }
}

delegate_driver!(K);

// N:
//  <- s
//  ...
//  -> e, es

/// One-way handshake toward a known responder; the initiator stays
/// anonymous.
pub struct N {
    driver: Driver,
    e: KeyPair,
    rs: PublicKey,
}

impl N {
    pub fn new(their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "N"),
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        Ok(())
    }
}

delegate_driver!(N);

// X:
//  <- s
//  ...
//  -> e, es, s, ss

/// One-way handshake transmitting the initiator's static key encrypted.
pub struct X {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    rs: PublicKey,
}

impl X {
    pub fn new(my_static: KeyPair, their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "X"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(1, PLAIN_AND_SEALED_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        self.driver.encrypt_key(&self.s.public, buffer);
        self.driver.mix_key(self.s.dh(&self.rs)?);
        Ok(())
    }
}

delegate_driver!(X);

// NNpsk2:
//  -> e
//  <- e, ee, psk

/// Two-way handshake authenticated by a pre-shared symmetric key.
pub struct NNpsk2 {
    driver: Driver,
    psk: Zeroizing<Vec<u8>>,
    e: KeyPair,
}

impl NNpsk2 {
    pub fn new(psk: &[u8]) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "NNpsk2"),
            psk: Zeroizing::new(psk.to_vec()),
            e: KeyPair::generate(&mut OsRng),
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.mix_psk(&self.psk);
        Ok(())
    }
}

delegate_driver!(NNpsk2);

// KK:
//  -> s
//  <- s
//  ...
//  -> e, es, ss
//  <- e, ee, se

/// Two-way mutual handshake where both static keys are known a priori.
pub struct KK {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    rs: PublicKey,
}

impl KK {
    pub fn new(my_static: KeyPair, their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "KK"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        self.driver.mix_key(self.s.dh(&self.rs)?);
        Ok(())
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.mix_key(self.s.dh(&re)?);
        Ok(())
    }
}

delegate_driver!(KK);

// NK:
//  <- s
//  ...
//  -> e, es
//  <- e, ee

/// Two-way handshake authenticating only the responder.
pub struct NK {
    driver: Driver,
    e: KeyPair,
    rs: PublicKey,
}

impl NK {
    pub fn new(their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "NK"),
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        Ok(())
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.e.dh(&re)?);
        Ok(())
    }
}

delegate_driver!(NK);

// NX:
//  -> e
//  <- e, ee, s, es

/// Two-way handshake where the responder transmits its static key
/// encrypted; the initiator learns it during the run.
pub struct NX {
    driver: Driver,
    e: KeyPair,
    rs: Option<PublicKey>,
}

impl NX {
    pub fn new() -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "NX"),
            e: KeyPair::generate(&mut OsRng),
            rs: None,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(2, PLAIN_AND_SEALED_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.e.dh(&re)?);
        let sealed = buffer
            .get(PLAIN_KEY..PLAIN_AND_SEALED_KEY)
            .ok_or(Error::CiphertextTooShort)?;
        let rs = self.driver.decrypt_key(sealed)?;
        self.driver.mix_key(self.e.dh(&rs)?);
        self.rs = Some(rs);
        Ok(())
    }

    /// The responder's static key, once message 2 has been read.
    pub fn remote_static(&self) -> Option<&PublicKey> {
        self.rs.as_ref()
    }
}

impl Default for NX {
    fn default() -> Self {
        Self::new()
    }
}

delegate_driver!(NX);

// XX:
//  -> e
//  <- e, ee, s, es
//  -> s, se

/// Three-message mutual handshake; both static keys are transmitted
/// encrypted during the run.
pub struct XX {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    re: Option<PublicKey>,
    rs: Option<PublicKey>,
}

impl XX {
    pub fn new(my_static: KeyPair) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "XX"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            re: None,
            rs: None,
        }
    }

    pub fn first_write(&mut self, buffer: &mut Vec<u8>) {
        self.driver.step(1, PLAIN_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(2, PLAIN_AND_SEALED_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.e.dh(&re)?);
        let sealed = buffer
            .get(PLAIN_KEY..PLAIN_AND_SEALED_KEY)
            .ok_or(Error::CiphertextTooShort)?;
        let rs = self.driver.decrypt_key(sealed)?;
        self.driver.mix_key(self.e.dh(&rs)?);
        self.re = Some(re);
        self.rs = Some(rs);
        Ok(())
    }

    pub fn second_write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(3, SEALED_KEY);
        let re = self.re.expect("message 2 not yet read");
        self.driver.encrypt_key(&self.s.public, buffer);
        self.driver.mix_key(self.s.dh(&re)?);
        Ok(())
    }

    /// The responder's static key, once message 2 has been read.
    pub fn remote_static(&self) -> Option<&PublicKey> {
        self.rs.as_ref()
    }
}

delegate_driver!(XX);

// IK:
//  <- s
//  ...
//  -> e, es, s, ss
//  <- e, ee, se

/// Two-message mutual handshake toward a known responder; the
/// initiator's static key travels encrypted in message 1.
pub struct IK {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    rs: PublicKey,
}

impl IK {
    pub fn new(my_static: KeyPair, their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Initiator, "IK"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
        }
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(1, PLAIN_AND_SEALED_KEY);
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        self.driver.encrypt_key(&self.s.public, buffer);
        self.driver.mix_key(self.s.dh(&self.rs)?);
        Ok(())
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.mix_key(self.s.dh(&re)?);
        Ok(())
    }
}

delegate_driver!(IK);
