use crate::{ast::Pos, error::Error, literal::Value};

/// Size of the addressable memory image.
pub const MEMORY_SIZE: usize = 0x10000;

/// Default filler byte, $EA = NOP
pub const DEFAULT_FILLER: u8 = 0xEA;

/// Address cursor over the 64K output image.
///
/// A dry memory tracks addresses and validates writes without touching the
/// image; the sizing pass runs on one.
#[derive(Debug, Clone)]
pub struct Memory {
    address: u32,
    start: Option<u16>,
    filler: u8,
    image: Vec<u8>,
    dry: bool,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            address: 0,
            start: None,
            filler: DEFAULT_FILLER,
            image: vec![0; MEMORY_SIZE],
            dry: false,
        }
    }

    pub fn dry() -> Self {
        Memory {
            image: Vec::new(),
            dry: true,
            ..Memory::new()
        }
    }

    /// Where the next byte will be written.
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Address of the first byte of the program.
    pub fn start(&self) -> u16 {
        self.start.unwrap_or(0)
    }

    /// Byte offset of the cursor relative to the program start.
    pub fn offset(&self) -> u32 {
        self.address - self.start() as u32
    }

    pub fn filler(&self) -> u8 {
        self.filler
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn into_image(self) -> Vec<u8> {
        self.image
    }

    pub fn set_origin(&mut self, address: u16, pos: Pos) -> Result<(), Error> {
        let address = address as u32;
        if self.start.is_none() {
            self.start = Some(address as u16);
            self.address = address;
            return Ok(());
        }
        if address < self.address {
            return Err(Error::BackwardAddress(pos, address, self.address));
        }
        if !self.dry {
            self.image[self.address as usize..address as usize].fill(self.filler);
        }
        self.address = address;
        Ok(())
    }

    pub fn write(&mut self, value: &Value, pos: Pos) -> Result<(), Error> {
        let end = self.address as usize + value.length;
        if end > MEMORY_SIZE {
            return Err(Error::Overflow(pos, self.address, value.length));
        }
        if self.start.is_none() {
            self.start = Some(self.address as u16);
        }
        if !self.dry {
            self.image[self.address as usize..end].copy_from_slice(&value.bytes());
        }
        self.address = end as u32;
        Ok(())
    }

    /// `None` restores the default filler.
    pub fn set_filler(&mut self, value: Option<&Value>, pos: Pos) -> Result<(), Error> {
        self.filler = match value {
            None => DEFAULT_FILLER,
            Some(value) if value.data > 0xFF => {
                return Err(Error::Range(
                    pos,
                    format!("Filler value ${:X} is larger than $FF", value.data),
                ))
            }
            // negative literals are framed as two's complement
            Some(value) => value.data as u8,
        };
        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Endian;

    fn pos() -> Pos {
        Pos::new(1, 1)
    }

    #[test]
    fn first_origin_sets_start() {
        let mut mem = Memory::new();
        mem.set_origin(0x0600, pos()).unwrap();
        assert_eq!((mem.start(), mem.address(), mem.offset()), (0x0600, 0x0600, 0));
        // no gap is filled before the program start
        assert_eq!(mem.image()[0x05FF], 0x00);
    }

    #[test]
    fn gap_is_filled() {
        let mut mem = Memory::new();
        mem.set_origin(0x0600, pos()).unwrap();
        mem.set_filler(Some(&Value::byte(0x00)), pos()).unwrap();
        mem.write(&Value::byte(0x01), pos()).unwrap();
        mem.set_filler(Some(&Value::byte(0x77)), pos()).unwrap();
        mem.set_origin(0x0610, pos()).unwrap();
        assert_eq!(mem.image()[0x0600], 0x01);
        assert!(mem.image()[0x0601..0x0610].iter().all(|&b| b == 0x77));
        assert_eq!(mem.address(), 0x0610);
        assert_eq!(mem.start(), 0x0600);
    }

    #[test]
    fn default_filler_is_nop() {
        let mut mem = Memory::new();
        mem.set_origin(0x10, pos()).unwrap();
        mem.set_origin(0x12, pos()).unwrap();
        assert_eq!(&mem.image()[0x10..0x12], &[0xEA, 0xEA]);
        mem.set_filler(Some(&Value::byte(1)), pos()).unwrap();
        mem.set_filler(None, pos()).unwrap();
        assert_eq!(mem.filler(), DEFAULT_FILLER);
    }

    #[test]
    fn backward_origin() {
        let mut mem = Memory::new();
        mem.set_origin(0x0600, pos()).unwrap();
        mem.write(&Value::byte(0), pos()).unwrap();
        let err = mem.set_origin(0x0600, pos()).unwrap_err();
        assert!(matches!(err, Error::BackwardAddress(_, 0x0600, 0x0601)));
        // same address is not a jump
        assert!(mem.set_origin(0x0601, pos()).is_ok());
    }

    #[test]
    fn write_endianness() {
        let mut mem = Memory::new();
        mem.set_origin(0x0200, pos()).unwrap();
        let big = Value {
            data: 0x1234,
            length: 2,
            endian: Endian::Big,
        };
        mem.write(&big, pos()).unwrap();
        mem.write(&Value::word_le(0x1234), pos()).unwrap();
        assert_eq!(&mem.image()[0x0200..0x0204], &[0x12, 0x34, 0x34, 0x12]);
        assert_eq!(mem.address(), 0x0204);
    }

    #[test]
    fn first_write_sets_start() {
        let mut mem = Memory::new();
        mem.write(&Value::byte(0xA9), pos()).unwrap();
        assert_eq!(mem.start(), 0);
        mem.set_origin(0x0004, pos()).unwrap();
        assert_eq!(&mem.image()[0..4], &[0xA9, 0xEA, 0xEA, 0xEA]);
        assert_eq!(mem.offset(), 4);
    }

    #[test]
    fn overflow() {
        let mut mem = Memory::new();
        mem.set_origin(0xFFFF, pos()).unwrap();
        let err = mem.write(&Value::word_le(0), pos()).unwrap_err();
        assert!(matches!(err, Error::Overflow(_, 0xFFFF, 2)));
        mem.write(&Value::byte(0x60), pos()).unwrap();
        assert_eq!(mem.address(), 0x10000);
        assert!(mem.write(&Value::byte(0), pos()).is_err());
    }

    #[test]
    fn filler_range() {
        let mut mem = Memory::new();
        let wide = Value {
            data: 0x100,
            length: 2,
            endian: Endian::Big,
        };
        assert!(matches!(mem.set_filler(Some(&wide), pos()), Err(Error::Range(..))));
        let neg = Value {
            data: -1,
            length: 1,
            endian: Endian::Big,
        };
        mem.set_filler(Some(&neg), pos()).unwrap();
        assert_eq!(mem.filler(), 0xFF);
    }

    #[test]
    fn dry_memory_tracks_addresses_only() {
        let mut mem = Memory::dry();
        mem.set_origin(0x0600, pos()).unwrap();
        mem.write(&Value::word_le(0x1234), pos()).unwrap();
        mem.set_origin(0x0700, pos()).unwrap();
        assert_eq!(mem.address(), 0x0700);
        assert!(mem.image().is_empty());
    }
}
