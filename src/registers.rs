use std::fmt;

use crate::module::EmulatorModule;

/// Read-through view of the CPU registers in module memory.
///
/// Nothing is copied: every accessor reads the heap again, so a view always shows the state
/// after the most recent step.
///
/// The register struct is packed with little-endian pairs, low register first:
///
/// ```text
/// +0 F   +1 A   +2 C   +3 B   +4 E   +5 D   +6 L   +7 H   +8 SP   +10 PC
/// ```
#[derive(Clone, Copy)]
pub struct RegisterView<'a> {
    module: &'a dyn EmulatorModule,
    /// Heap offset of the register struct.
    address: usize,
}

/// CPU flags, stored in the upper nibble of F.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Carry = 4,
    HalfCarry = 5,
    Subtract = 6,
    Zero = 7,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::Zero, Flag::Subtract, Flag::HalfCarry, Flag::Carry];

    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Single-letter name, as printed in flag columns.
    pub fn letter(self) -> char {
        match self {
            Self::Carry => 'C',
            Self::HalfCarry => 'H',
            Self::Subtract => 'N',
            Self::Zero => 'Z',
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Carry => write!(f, "Carry"),
            Self::HalfCarry => write!(f, "Half Carry"),
            Self::Subtract => write!(f, "Subtract"),
            Self::Zero => write!(f, "Zero"),
        }
    }
}

/// Value of bit `n` of `value`.
pub fn get_bit(value: u8, n: u8) -> u8 {
    (value >> n) & 1
}

impl<'a> RegisterView<'a> {
    pub fn new(module: &'a dyn EmulatorModule, address: usize) -> Self {
        Self { module, address }
    }

    fn byte(&self, offset: usize) -> u8 {
        self.module.read_u8(self.address + offset)
    }

    fn word(&self, index: usize) -> u16 {
        self.module.read_u16(self.address + index * 2)
    }

    pub fn af(&self) -> u16 {
        self.word(0)
    }
    pub fn bc(&self) -> u16 {
        self.word(1)
    }
    pub fn de(&self) -> u16 {
        self.word(2)
    }
    pub fn hl(&self) -> u16 {
        self.word(3)
    }
    pub fn sp(&self) -> u16 {
        self.word(4)
    }
    pub fn pc(&self) -> u16 {
        self.word(5)
    }

    pub fn f(&self) -> u8 {
        self.byte(0)
    }
    pub fn a(&self) -> u8 {
        self.byte(1)
    }
    pub fn c(&self) -> u8 {
        self.byte(2)
    }
    pub fn b(&self) -> u8 {
        self.byte(3)
    }
    pub fn e(&self) -> u8 {
        self.byte(4)
    }
    pub fn d(&self) -> u8 {
        self.byte(5)
    }
    pub fn l(&self) -> u8 {
        self.byte(6)
    }
    pub fn h(&self) -> u8 {
        self.byte(7)
    }

    pub fn flag(&self, flag: Flag) -> bool {
        get_bit(self.f(), flag.bit()) == 1
    }

    pub fn is_carry_set(&self) -> bool {
        self.flag(Flag::Carry)
    }
    pub fn is_half_carry_set(&self) -> bool {
        self.flag(Flag::HalfCarry)
    }
    pub fn is_subtract_set(&self) -> bool {
        self.flag(Flag::Subtract)
    }
    pub fn is_zero_set(&self) -> bool {
        self.flag(Flag::Zero)
    }
}

impl fmt::Debug for RegisterView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterView")
            .field("af", &format_args!("{:#06x}", self.af()))
            .field("bc", &format_args!("{:#06x}", self.bc()))
            .field("de", &format_args!("{:#06x}", self.de()))
            .field("hl", &format_args!("{:#06x}", self.hl()))
            .field("sp", &format_args!("{:#06x}", self.sp()))
            .field("pc", &format_args!("{:#06x}", self.pc()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;

    /// Register struct at heap offset 4, preceded by junk.
    struct Registers(Vec<u8>);

    impl EmulatorModule for Registers {
        fn init(&mut self) -> Result<(), LoadError> {
            Ok(())
        }
        fn step(&mut self) {}
        fn register_address(&self) -> usize {
            4
        }
        fn rom_address(&self) -> usize {
            0
        }
        fn heap(&self) -> &[u8] {
            &self.0
        }
        fn opcode_at(&self, _: u16) -> u8 {
            0
        }
        fn operand_at(&self, _: u16) -> u16 {
            0
        }
        fn name_at(&self, _: u16) -> usize {
            0
        }
        fn operand_size(&self, _: u8) -> u8 {
            0
        }
        fn next_opcode(&self) -> u8 {
            0
        }
        fn next_operand(&self) -> u16 {
            0
        }
        fn next_name(&self) -> usize {
            0
        }
    }

    fn heap_with_flags(f: u8) -> Registers {
        #[rustfmt::skip]
        let heap = vec![
            0xaa, 0xaa, 0xaa, 0xaa,
            f, 0x01,    // AF
            0x13, 0x00, // BC
            0xd8, 0x00, // DE
            0x4d, 0x01, // HL
            0xfe, 0xff, // SP
            0x50, 0x01, // PC
        ];
        Registers(heap)
    }

    #[test]
    fn pairs_and_singles_agree() {
        let module = heap_with_flags(0xb0);
        let view = RegisterView::new(&module, module.register_address());
        assert_eq!(view.af(), 0x01b0);
        assert_eq!(view.bc(), 0x0013);
        assert_eq!(view.de(), 0x00d8);
        assert_eq!(view.hl(), 0x014d);
        assert_eq!(view.sp(), 0xfffe);
        assert_eq!(view.pc(), 0x0150);

        assert_eq!(view.af(), (view.a() as u16) << 8 | view.f() as u16);
        assert_eq!(view.bc(), (view.b() as u16) << 8 | view.c() as u16);
        assert_eq!(view.de(), (view.d() as u16) << 8 | view.e() as u16);
        assert_eq!(view.hl(), (view.h() as u16) << 8 | view.l() as u16);
        assert_eq!(view.a(), 0x01);
        assert_eq!(view.h(), 0x01);
        assert_eq!(view.l(), 0x4d);
    }

    #[test]
    fn flags_come_from_upper_nibble() {
        // Z=1 N=0 H=1 C=1
        let module = heap_with_flags(0b1011_0000);
        let view = RegisterView::new(&module, 4);
        assert!(view.is_zero_set());
        assert!(!view.is_subtract_set());
        assert!(view.is_half_carry_set());
        assert!(view.is_carry_set());

        // Lower nibble is ignored
        let module = heap_with_flags(0b0100_1111);
        let view = RegisterView::new(&module, 4);
        assert!(!view.is_zero_set());
        assert!(view.is_subtract_set());
        assert!(!view.is_half_carry_set());
        assert!(!view.is_carry_set());
    }

    #[test]
    fn flag_reads_are_idempotent() {
        for f in [0x00, 0x10, 0x20, 0x40, 0x80, 0xf0, 0x5a] {
            let module = heap_with_flags(f);
            let view = RegisterView::new(&module, 4);
            for flag in Flag::ALL {
                assert_eq!(view.flag(flag), view.flag(flag));
                assert_eq!(view.flag(flag), get_bit(f, flag.bit()) == 1);
            }
        }
    }

    #[test]
    fn reads_go_through_to_memory() {
        let mut module = heap_with_flags(0x00);
        assert!(!RegisterView::new(&module, 4).is_carry_set());
        module.0[4] = 0x10;
        assert!(RegisterView::new(&module, 4).is_carry_set());
    }

    #[test]
    fn get_bit_extracts() {
        assert_eq!(get_bit(0b1000_0000, 7), 1);
        assert_eq!(get_bit(0b1000_0000, 6), 0);
        assert_eq!(get_bit(0xff, 0), 1);
    }
}
