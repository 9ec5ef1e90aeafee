use std::fs;
use std::path::{Path, PathBuf};

use super::{EmulatorModule, ModuleLoader, OPS};
use crate::error::LoadError;

/// Start of the NUL-terminated mnemonic pool.
const NAMES_ADDR: usize = 0x0000;
/// Start of the packed register struct.
const REG_ADDR: usize = 0x1000;
/// Start of the emulated 64KB address space.
const MEM_ADDR: usize = 0x2000;
const MEM_SIZE: usize = 0x1_0000;
const HEAP_SIZE: usize = MEM_ADDR + MEM_SIZE;

/// Visible ROM banks 0 and 1.
pub const ROM_SIZE: usize = 0x8000;

/// Register values left behind by the boot ROM.
const POWER_UP: [(usize, u16); 6] = [
    (0, 0x01B0),  // AF
    (2, 0x0013),  // BC
    (4, 0x00D8),  // DE
    (6, 0x014D),  // HL
    (8, 0xFFFE),  // SP
    (10, 0x0100), // PC
];
const PC_OFFSET: usize = 10;

/// Reference module over a raw ROM image.
///
/// Memory is laid out in one flat heap, as a compiled core would expose it. Stepping walks the
/// program without executing it: the program counter moves past each instruction and follows
/// unconditional `JP a16` and `JR r8`. All other registers keep their power-up values.
pub struct RomModule {
    image: Vec<u8>,
    heap: Box<[u8]>,
    /// Heap pointer of each opcode's mnemonic.
    names: [usize; 256],
}

/// Loads a [`RomModule`] from an in-memory image or a file.
pub struct RomLoader {
    source: Source,
}

enum Source {
    Image(Vec<u8>),
    Path(PathBuf),
}

impl RomLoader {
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            source: Source::Image(image),
        }
    }

    /// File is read when the module is loaded, not here.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }
}

impl ModuleLoader for RomLoader {
    type Module = RomModule;

    fn load(&mut self) -> Result<RomModule, LoadError> {
        let image = match &mut self.source {
            Source::Image(image) => std::mem::take(image),
            Source::Path(path) => fs::read(path.as_path()).map_err(|error| LoadError::Io {
                path: path.display().to_string(),
                reason: error.to_string(),
            })?,
        };
        RomModule::new(image)
    }
}

impl RomModule {
    pub fn new(image: Vec<u8>) -> Result<Self, LoadError> {
        if image.is_empty() {
            return Err(LoadError::EmptyImage);
        }
        if image.len() > ROM_SIZE {
            log::warn!(
                "ROM image is {} bytes; only the first {} are mapped",
                image.len(),
                ROM_SIZE
            );
        }
        Ok(Self {
            image,
            heap: vec![0; HEAP_SIZE].into_boxed_slice(),
            names: [0; 256],
        })
    }

    fn write_names(&mut self) {
        let mut cursor = NAMES_ADDR;
        for (opcode, op) in OPS.iter().enumerate() {
            self.names[opcode] = cursor;
            let bytes = op.name.as_bytes();
            self.heap[cursor..cursor + bytes.len()].copy_from_slice(bytes);
            cursor += bytes.len();
            self.heap[cursor] = 0;
            cursor += 1;
        }
        debug_assert!(cursor <= REG_ADDR, "mnemonic pool overflowed into registers");
    }

    #[inline]
    fn mem(&self, address: u16) -> u8 {
        self.heap[MEM_ADDR + address as usize]
    }

    fn word(&self, address: u16) -> u16 {
        u16::from_le_bytes([self.mem(address), self.mem(address.wrapping_add(1))])
    }

    fn pc(&self) -> u16 {
        self.read_u16(REG_ADDR + PC_OFFSET)
    }

    fn set_pc(&mut self, pc: u16) {
        let pointer = REG_ADDR + PC_OFFSET;
        self.heap[pointer..pointer + 2].copy_from_slice(&pc.to_le_bytes());
    }
}

impl EmulatorModule for RomModule {
    fn init(&mut self) -> Result<(), LoadError> {
        self.heap.fill(0);
        self.write_names();

        let len = self.image.len().min(ROM_SIZE);
        self.heap[MEM_ADDR..MEM_ADDR + len].copy_from_slice(&self.image[..len]);

        for (offset, value) in POWER_UP {
            let pointer = REG_ADDR + offset;
            self.heap[pointer..pointer + 2].copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    fn step(&mut self) {
        let pc = self.pc();
        let opcode = self.mem(pc);
        let width = 1 + OPS[opcode as usize].operand_size as u16;
        let next = pc.wrapping_add(width);
        let target = match opcode {
            // JP a16
            0xC3 => self.word(pc.wrapping_add(1)),
            // JR r8
            0x18 => {
                let offset = self.mem(pc.wrapping_add(1)) as i8;
                next.wrapping_add(offset as u16)
            }
            _ => next,
        };
        self.set_pc(target);
    }

    fn register_address(&self) -> usize {
        REG_ADDR
    }

    fn rom_address(&self) -> usize {
        MEM_ADDR
    }

    fn heap(&self) -> &[u8] {
        &self.heap
    }

    fn opcode_at(&self, address: u16) -> u8 {
        self.mem(address)
    }

    fn operand_at(&self, address: u16) -> u16 {
        let opcode = self.mem(address);
        match OPS[opcode as usize].operand_size {
            1 => self.mem(address.wrapping_add(1)) as u16,
            2 => self.word(address.wrapping_add(1)),
            _ => 0,
        }
    }

    fn name_at(&self, address: u16) -> usize {
        self.names[self.mem(address) as usize]
    }

    fn operand_size(&self, opcode: u8) -> u8 {
        OPS[opcode as usize].operand_size
    }

    fn next_opcode(&self) -> u8 {
        self.opcode_at(self.pc())
    }

    fn next_operand(&self) -> u16 {
        self.operand_at(self.pc())
    }

    fn next_name(&self) -> usize {
        self.name_at(self.pc())
    }
}

/// [`RomModule`] with one injected fault, for exercising failure paths.
#[cfg(test)]
pub(crate) mod faulty {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Fault {
        /// Every `init` after the first wipes memory and fails.
        FailingReset,
        /// This opcode reports an operand width of 3.
        WideOperand(u8),
    }

    pub const RESET_FAILURE: &str = "image went away";

    pub struct FaultyLoader {
        image: Vec<u8>,
        fault: Fault,
    }

    impl FaultyLoader {
        pub fn new(image: Vec<u8>, fault: Fault) -> Self {
            Self { image, fault }
        }
    }

    impl ModuleLoader for FaultyLoader {
        type Module = FaultyModule;

        fn load(&mut self) -> Result<FaultyModule, LoadError> {
            Ok(FaultyModule {
                inner: RomModule::new(std::mem::take(&mut self.image))?,
                fault: self.fault,
                inits: 0,
            })
        }
    }

    pub struct FaultyModule {
        inner: RomModule,
        fault: Fault,
        inits: u32,
    }

    impl EmulatorModule for FaultyModule {
        fn init(&mut self) -> Result<(), LoadError> {
            self.inits += 1;
            if self.fault == Fault::FailingReset && self.inits > 1 {
                self.inner.heap.fill(0);
                return Err(LoadError::Module {
                    reason: RESET_FAILURE.to_string(),
                });
            }
            self.inner.init()
        }
        fn step(&mut self) {
            self.inner.step()
        }
        fn register_address(&self) -> usize {
            self.inner.register_address()
        }
        fn rom_address(&self) -> usize {
            self.inner.rom_address()
        }
        fn heap(&self) -> &[u8] {
            self.inner.heap()
        }
        fn opcode_at(&self, address: u16) -> u8 {
            self.inner.opcode_at(address)
        }
        fn operand_at(&self, address: u16) -> u16 {
            self.inner.operand_at(address)
        }
        fn name_at(&self, address: u16) -> usize {
            self.inner.name_at(address)
        }
        fn operand_size(&self, opcode: u8) -> u8 {
            match self.fault {
                Fault::WideOperand(wide) if wide == opcode => 3,
                _ => self.inner.operand_size(opcode),
            }
        }
        fn next_opcode(&self) -> u8 {
            self.inner.next_opcode()
        }
        fn next_operand(&self) -> u16 {
            self.inner.next_operand()
        }
        fn next_name(&self) -> usize {
            self.inner.next_name()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom(patches: &[(usize, &[u8])]) -> RomModule {
        let mut image = vec![0u8; ROM_SIZE];
        for (address, bytes) in patches {
            image[*address..*address + bytes.len()].copy_from_slice(bytes);
        }
        let mut module = RomModule::new(image).unwrap();
        module.init().unwrap();
        module
    }

    #[test]
    fn empty_image_is_rejected() {
        assert_eq!(RomModule::new(Vec::new()).err(), Some(LoadError::EmptyImage));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let mut loader = RomLoader::from_path("this/file/does/not/exist.gb");
        assert!(matches!(loader.load(), Err(LoadError::Io { .. })));
    }

    #[test]
    fn power_up_registers() {
        let module = rom(&[]);
        assert_eq!(module.read_u16(REG_ADDR), 0x01B0);
        assert_eq!(module.read_u8(REG_ADDR), 0xB0); // F
        assert_eq!(module.read_u8(REG_ADDR + 1), 0x01); // A
        assert_eq!(module.pc(), 0x0100);
        assert_eq!(module.read_u16(REG_ADDR + 8), 0xFFFE);
    }

    #[test]
    fn names_are_heap_strings() {
        let module = rom(&[(0x150, &[0x3E, 0x2A][..])]);
        assert_eq!(module.string_at(module.name_at(0x150)), "LD A,d8");
        assert_eq!(module.string_at(module.name_at(0x151)), "LD A,(HL+)");
        assert_eq!(module.operand_at(0x150), 0x2A);
    }

    #[test]
    fn step_walks_and_follows_jumps() {
        let mut module = rom(&[
            (0x100, &[0x00, 0xC3, 0x50, 0x01][..]),
            (0x150, &[0x01, 0x34, 0x12, 0x18, 0xFE][..]),
        ]);
        module.step();
        assert_eq!(module.pc(), 0x101);
        module.step();
        assert_eq!(module.pc(), 0x150);
        assert_eq!(module.next_operand(), 0x1234);
        module.step();
        assert_eq!(module.pc(), 0x153);
        // `JR -2` jumps to itself
        module.step();
        assert_eq!(module.pc(), 0x153);
    }

    #[test]
    fn init_resets_state() {
        let mut module = rom(&[]);
        module.step();
        module.step();
        assert_eq!(module.pc(), 0x102);
        module.init().unwrap();
        assert_eq!(module.pc(), 0x100);
    }

    #[test]
    fn oversized_image_is_truncated() {
        let mut image = vec![0u8; ROM_SIZE * 2];
        image[ROM_SIZE] = 0xFF;
        let mut module = RomModule::new(image).unwrap();
        module.init().unwrap();
        assert_eq!(module.opcode_at(0x8000), 0x00);
    }
}
