//! Mock I2C bus for testing

use super::I2cBus;
use crate::error::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock bus that records writes and replays scripted register reads
#[derive(Clone)]
pub struct MockBus {
    inner: Arc<Mutex<MockBusInner>>,
}

struct MockBusInner {
    writes: Vec<(u8, Vec<u8>)>,
    register_writes: Vec<(u8, u8, Vec<u8>)>,
    reads: HashMap<(u8, u8), VecDeque<Vec<u8>>>,
    fail_writes: bool,
}

impl MockBus {
    /// Create a new mock bus
    pub fn new() -> Self {
        MockBus {
            inner: Arc::new(Mutex::new(MockBusInner {
                writes: Vec::new(),
                register_writes: Vec::new(),
                reads: HashMap::new(),
                fail_writes: false,
            })),
        }
    }

    /// Queue bytes to be returned by the next read of `(addr, reg)`
    pub fn queue_read(&self, addr: u8, reg: u8, bytes: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .reads
            .entry((addr, reg))
            .or_default()
            .push_back(bytes.to_vec());
    }

    /// Make all subsequent writes fail
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Raw writes seen so far, as (address, bytes)
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Register writes seen so far, as (address, register, bytes)
    pub fn register_writes(&self) -> Vec<(u8, u8, Vec<u8>)> {
        self.inner.lock().unwrap().register_writes.clone()
    }
}

impl I2cBus for MockBus {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(Error::Bus("injected write failure".to_string()));
        }
        inner.writes.push((addr, bytes.to_vec()));
        Ok(())
    }

    fn write_register(&mut self, addr: u8, reg: u8, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes {
            return Err(Error::Bus("injected write failure".to_string()));
        }
        inner.register_writes.push((addr, reg, bytes.to_vec()));
        Ok(())
    }

    fn read_register(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let queue = inner
            .reads
            .get_mut(&(addr, reg))
            .ok_or_else(|| Error::Bus(format!("no scripted read for {:#04x}/{:#04x}", addr, reg)))?;
        let bytes = queue
            .pop_front()
            .ok_or_else(|| Error::Bus(format!("scripted reads exhausted for {:#04x}/{:#04x}", addr, reg)))?;
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(())
    }
}

impl Default for MockBus {
    fn default() -> Self {
        Self::new()
    }
}
