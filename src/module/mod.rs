mod opcodes;
mod rom;

pub use self::opcodes::{Op, OPS};
pub use self::rom::{RomLoader, RomModule, ROM_SIZE};
#[cfg(test)]
pub(crate) use self::rom::faulty;

use crate::error::LoadError;

/// Capability surface of an emulator core.
///
/// The core is opaque: everything the debugger knows about it is read through these entry
/// points, and every address it hands out is an offset into [`EmulatorModule::heap`].
pub trait EmulatorModule {
    /// Initialization entry point. Loads the program image and resets the CPU.
    fn init(&mut self) -> Result<(), LoadError>;

    /// Execute exactly one instruction.
    fn step(&mut self);

    /// Heap offset of the packed register struct.
    fn register_address(&self) -> usize;

    /// Heap offset of the first ROM bank.
    fn rom_address(&self) -> usize;

    /// Raw module memory.
    fn heap(&self) -> &[u8];

    /// Opcode byte at `address` of the emulated address space.
    fn opcode_at(&self, address: u16) -> u8;

    /// Operand of the instruction starting at `address`.
    fn operand_at(&self, address: u16) -> u16;

    /// Heap pointer to the NUL-terminated mnemonic of the instruction at `address`.
    fn name_at(&self, address: u16) -> usize;

    /// Raw operand width of `opcode`, in bytes.
    ///
    /// A well-behaved module only returns 0, 1, or 2.
    fn operand_size(&self, opcode: u8) -> u8;

    fn next_opcode(&self) -> u8;
    fn next_operand(&self) -> u16;
    fn next_name(&self) -> usize;

    /// Read one heap byte. Reads outside the heap yield `0`.
    fn read_u8(&self, pointer: usize) -> u8 {
        self.heap().get(pointer).copied().unwrap_or(0)
    }

    /// Read one little-endian heap word. Reads outside the heap yield `0`.
    fn read_u16(&self, pointer: usize) -> u16 {
        u16::from_le_bytes([self.read_u8(pointer), self.read_u8(pointer + 1)])
    }

    /// Convert a NUL-terminated heap string to an owned `String`.
    ///
    /// Unterminated strings end at the end of the heap. Invalid UTF-8 is replaced.
    fn string_at(&self, pointer: usize) -> String {
        let Some(bytes) = self.heap().get(pointer..) else {
            return String::new();
        };
        let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }
}

/// Produces a module instance. Stands in for fetching and instantiating a compiled core.
pub trait ModuleLoader {
    type Module: EmulatorModule;

    fn load(&mut self) -> Result<Self::Module, LoadError>;
}
