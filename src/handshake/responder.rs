//! Responder-side pattern state machines.

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

/// Responder for the one-way K pattern; the initiator's static key is
/// known a priori.
pub struct K {
    driver: Driver,
    s: KeyPair,
    rs: PublicKey,
}

impl K {
    pub fn new(my_static: KeyPair, their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "K"),
            s: my_static,
            rs: their_static,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.s.dh(&re)?);
        self.driver.mix_key(self.s.dh(&self.rs)?);
        Ok(())
    }
}

delegate_driver!(K);

// N:
//  <- s
//  ...
//  -> e, es

/// Responder for the one-way N pattern; the initiator stays anonymous.
pub struct N {
    driver: Driver,
    s: KeyPair,
}

impl N {
    pub fn new(my_static: KeyPair) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "N"),
            s: my_static,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.s.dh(&re)?);
        Ok(())
    }
}

delegate_driver!(N);

// X:
//  <- s
//  ...
//  -> e, es, s, ss

/// Responder for the one-way X pattern; learns the initiator's static
/// key from the encrypted block in message 1.
pub struct X {
    driver: Driver,
    s: KeyPair,
    rs: Option<PublicKey>,
}

impl X {
    pub fn new(my_static: KeyPair) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "X"),
            s: my_static,
            rs: None,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_AND_SEALED_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.s.dh(&re)?);
        let sealed = buffer
            .get(PLAIN_KEY..PLAIN_AND_SEALED_KEY)
            .ok_or(Error::CiphertextTooShort)?;
        let rs = self.driver.decrypt_key(sealed)?;
        self.driver.mix_key(self.s.dh(&rs)?);
        self.rs = Some(rs);
        Ok(())
    }

    /// The initiator's static key, once message 1 has been read.
    pub fn remote_static(&self) -> Option<&PublicKey> {
        self.rs.as_ref()
    }
}

delegate_driver!(X);

// NNpsk2:
//  -> e
//  <- e, ee, psk

/// Responder for the PSK-authenticated two-way pattern.
pub struct NNpsk2 {
    driver: Driver,
    psk: Zeroizing<Vec<u8>>,
    e: KeyPair,
    re: Option<PublicKey>,
}

impl NNpsk2 {
    pub fn new(psk: &[u8]) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "NNpsk2"),
            psk: Zeroizing::new(psk.to_vec()),
            e: KeyPair::generate(&mut OsRng),
            re: None,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.re = Some(re);
        Ok(())
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = self.re.expect("message 1 not yet read");
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
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

/// Responder for the mutual KK pattern; both static keys are known a
/// priori.
pub struct KK {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    rs: PublicKey,
    re: Option<PublicKey>,
}

impl KK {
    pub fn new(my_static: KeyPair, their_static: PublicKey) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "KK"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            rs: their_static,
            re: None,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.s.dh(&re)?);
        self.driver.mix_key(self.s.dh(&self.rs)?);
        self.re = Some(re);
        Ok(())
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = self.re.expect("message 1 not yet read");
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.mix_key(self.e.dh(&self.rs)?);
        Ok(())
    }
}

delegate_driver!(KK);

// NK:
//  <- s
//  ...
//  -> e, es
//  <- e, ee

/// Responder for the NK pattern; only this side is authenticated.
pub struct NK {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    re: Option<PublicKey>,
}

impl NK {
    pub fn new(my_static: KeyPair) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "NK"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            re: None,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.s.dh(&re)?);
        self.re = Some(re);
        Ok(())
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = self.re.expect("message 1 not yet read");
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&re)?);
        Ok(())
    }
}

delegate_driver!(NK);

// NX:
//  -> e
//  <- e, ee, s, es

/// Responder for the NX pattern; transmits its own static key encrypted
/// in message 2.
pub struct NX {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    re: Option<PublicKey>,
}

impl NX {
    pub fn new(my_static: KeyPair) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "NX"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            re: None,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.re = Some(re);
        Ok(())
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(2, PLAIN_AND_SEALED_KEY);
        let re = self.re.expect("message 1 not yet read");
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.encrypt_key(&self.s.public, buffer);
        self.driver.mix_key(self.s.dh(&re)?);
        Ok(())
    }
}

delegate_driver!(NX);

// XX:
//  -> e
//  <- e, ee, s, es
//  -> s, se

/// Responder for the three-message mutual XX pattern.
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
            driver: Driver::new(Role::Responder, "XX"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            re: None,
            rs: None,
        }
    }

    pub fn first_read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.re = Some(re);
        Ok(())
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(2, PLAIN_AND_SEALED_KEY);
        let re = self.re.expect("message 1 not yet read");
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.encrypt_key(&self.s.public, buffer);
        self.driver.mix_key(self.s.dh(&re)?);
        Ok(())
    }

    pub fn second_read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(3, SEALED_KEY);
        let sealed = buffer.get(..SEALED_KEY).ok_or(Error::CiphertextTooShort)?;
        let rs = self.driver.decrypt_key(sealed)?;
        self.driver.mix_key(self.e.dh(&rs)?);
        self.rs = Some(rs);
        Ok(())
    }

    /// The initiator's static key, once message 3 has been read.
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

/// Responder for the IK pattern; learns the initiator's static key from
/// the encrypted block in message 1.
pub struct IK {
    driver: Driver,
    s: KeyPair,
    e: KeyPair,
    re: Option<PublicKey>,
    rs: Option<PublicKey>,
}

impl IK {
    pub fn new(my_static: KeyPair) -> Self {
        Self {
            driver: Driver::new(Role::Responder, "IK"),
            s: my_static,
            e: KeyPair::generate(&mut OsRng),
            re: None,
            rs: None,
        }
    }

    pub fn read(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.driver.step(1, PLAIN_AND_SEALED_KEY);
        let re = PublicKey::read_from(buffer)?;
        self.driver.mix_hash(&re);
        self.driver.mix_key(self.s.dh(&re)?);
        let sealed = buffer
            .get(PLAIN_KEY..PLAIN_AND_SEALED_KEY)
            .ok_or(Error::CiphertextTooShort)?;
        let rs = self.driver.decrypt_key(sealed)?;
        self.driver.mix_key(self.s.dh(&rs)?);
        self.re = Some(re);
        self.rs = Some(rs);
        Ok(())
    }

    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<(), Error> {
        self.driver.step(2, PLAIN_KEY);
        let re = self.re.expect("message 1 not yet read");
        let rs = self.rs.expect("message 1 not yet read");
        buffer.extend_from_slice(self.e.public.as_bytes());
        self.driver.mix_hash(&self.e.public);
        self.driver.mix_key(self.e.dh(&re)?);
        self.driver.mix_key(self.e.dh(&rs)?);
        Ok(())
    }

    /// The initiator's static key, once message 1 has been read.
    pub fn remote_static(&self) -> Option<&PublicKey> {
        self.rs.as_ref()
    }
}

delegate_driver!(IK);
