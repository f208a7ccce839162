//! DMA (Direct Memory Access) functions and structures.
//!
//! Only OAM DMA (the 0xFF46 source-page transfer) is modeled; CGB VRAM
//! DMA (HDMA) is out of scope.

use std::fmt::{self, Display, Formatter};

use crate::{consts::DMA_ADDR, mmu::BusComponent, warnln};

pub struct Dma {
    value_dma: u8,
    cycles_dma: u16,
    active_dma: bool,
}

impl Dma {
    pub fn new() -> Self {
        Self {
            value_dma: 0x0,
            cycles_dma: 0x0,
            active_dma: false,
        }
    }

    pub fn reset(&mut self) {
        self.value_dma = 0x0;
        self.cycles_dma = 0x0;
        self.active_dma = false;
    }

    pub fn clock(&mut self, _cycles: u16) {}

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            // 0xFF46 — DMA: OAM DMA source address & start
            DMA_ADDR => self.value_dma,
            _ => {
                warnln!("Reading from unknown DMA location 0x{:04x}", addr);
                0xff
            }
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            // 0xFF46 — DMA: OAM DMA source address & start
            DMA_ADDR => {
                self.value_dma = value;
                // transfer is 160 bytes at one byte per machine cycle,
                // counted here in T-states (4 per machine cycle)
                self.cycles_dma = 640;
                self.active_dma = true;
            }
            _ => warnln!("Writing to unknown DMA location 0x{:04x}", addr),
        }
    }

    pub fn value_dma(&self) -> u8 {
        self.value_dma
    }

    pub fn set_value_dma(&mut self, value: u8) {
        self.value_dma = value;
    }

    pub fn cycles_dma(&self) -> u16 {
        self.cycles_dma
    }

    pub fn set_cycles_dma(&mut self, value: u16) {
        self.cycles_dma = value;
    }

    pub fn active_dma(&self) -> bool {
        self.active_dma
    }

    pub fn set_active_dma(&mut self, value: bool) {
        self.active_dma = value;
    }

    pub fn active(&self) -> bool {
        self.active_dma
    }

    pub fn description(&self) -> String {
        format!(
            "active: {}, cycles: {}, value: 0x{:02x}",
            self.active_dma, self.cycles_dma, self.value_dma
        )
    }
}

impl BusComponent for Dma {
    fn read(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}

impl Default for Dma {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Dma {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::Dma;

    #[test]
    fn test_dma_default() {
        let dma = Dma::default();
        assert!(!dma.active_dma);
        assert!(!dma.active());
    }

    #[test]
    fn test_dma_reset() {
        let mut dma = Dma::new();
        dma.value_dma = 0xff;
        dma.cycles_dma = 0x0012;
        dma.active_dma = true;

        dma.reset();

        assert_eq!(dma.value_dma, 0x0);
        assert_eq!(dma.cycles_dma, 0x0);
        assert!(!dma.active_dma);
    }

    #[test]
    fn test_dma_set_active() {
        let mut dma = Dma::new();
        dma.set_active_dma(true);
        assert!(dma.active_dma);
        assert!(dma.active());
    }

    #[test]
    fn test_dma_write_starts_transfer() {
        let mut dma = Dma::new();
        dma.write(0xff46, 0xc0);
        assert_eq!(dma.value_dma(), 0xc0);
        assert_eq!(dma.cycles_dma(), 640);
        assert!(dma.active_dma());
    }
}
