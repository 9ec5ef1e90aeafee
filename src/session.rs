use std::cell::OnceCell;

use crate::decoder::{self, Instruction, InstructionTable};
use crate::error::{LoadError, SessionError};
use crate::module::{EmulatorModule, ModuleLoader, ROM_SIZE};
use crate::registers::RegisterView;

/// Owns one emulator module for its whole lifetime.
///
/// Derived views are computed on first use and memoized until [`Session::reset`].
pub struct Session<L: ModuleLoader> {
    loader: L,
    lifecycle: Lifecycle<L::Module>,
    register_address: OnceCell<usize>,
    rom: OnceCell<Box<[u8]>>,
    table: OnceCell<InstructionTable>,
}

enum Lifecycle<M> {
    Unloaded,
    Ready(M),
    Failed(LoadError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Ready,
    Failed,
}

impl<L: ModuleLoader> Session<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            lifecycle: Lifecycle::Unloaded,
            register_address: OnceCell::new(),
            rom: OnceCell::new(),
            table: OnceCell::new(),
        }
    }

    /// Load and initialize the module.
    ///
    /// Runs at most once. After a failure every call returns the same error without loading
    /// again.
    pub fn initialize(&mut self) -> Result<(), SessionError> {
        match &self.lifecycle {
            Lifecycle::Ready(_) => return Ok(()),
            Lifecycle::Failed(error) => return Err(SessionError::Load(error.clone())),
            Lifecycle::Unloaded => (),
        }

        let loaded = self.loader.load().and_then(|mut module| {
            module.init()?;
            Ok(module)
        });
        match loaded {
            Ok(module) => {
                log::info!("Emulator module initialized");
                self.lifecycle = Lifecycle::Ready(module);
                Ok(())
            }
            Err(error) => {
                log::error!("Failed to load emulator module: {}", error);
                self.lifecycle = Lifecycle::Failed(error.clone());
                Err(SessionError::Load(error))
            }
        }
    }

    pub fn state(&self) -> SessionState {
        match self.lifecycle {
            Lifecycle::Unloaded => SessionState::Unloaded,
            Lifecycle::Ready(_) => SessionState::Ready,
            Lifecycle::Failed(_) => SessionState::Failed,
        }
    }

    pub fn module(&self) -> Result<&L::Module, SessionError> {
        match &self.lifecycle {
            Lifecycle::Ready(module) => Ok(module),
            Lifecycle::Unloaded => Err(SessionError::Uninitialized),
            Lifecycle::Failed(error) => Err(SessionError::Load(error.clone())),
        }
    }

    fn module_mut(&mut self) -> Result<&mut L::Module, SessionError> {
        match &mut self.lifecycle {
            Lifecycle::Ready(module) => Ok(module),
            Lifecycle::Unloaded => Err(SessionError::Uninitialized),
            Lifecycle::Failed(error) => Err(SessionError::Load(error.clone())),
        }
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<(), SessionError> {
        self.module_mut()?.step();
        Ok(())
    }

    /// Live register view. Reads always reflect the latest step.
    pub fn registers(&self) -> Result<RegisterView<'_>, SessionError> {
        let module = self.module()?;
        let address = *self
            .register_address
            .get_or_init(|| module.register_address());
        Ok(RegisterView::new(module, address))
    }

    /// Instructions of the loaded program. Scanned on first call.
    pub fn instruction_table(&self) -> Result<&InstructionTable, SessionError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }
        let table = decoder::scan_rom(self.module()?)?;
        log::debug!("Decoded {} instructions", table.len());
        Ok(self.table.get_or_init(|| table))
    }

    /// Instruction at the program counter. Never cached.
    pub fn next_instruction(&self) -> Result<Instruction, SessionError> {
        let pc = self.registers()?.pc();
        Ok(decoder::decode_next(self.module()?, pc)?)
    }

    /// Read-only copy of the ROM banks, taken on first call.
    pub fn rom(&self) -> Result<&[u8], SessionError> {
        let module = self.module()?;
        let rom = self.rom.get_or_init(|| {
            let heap = module.heap();
            let start = module.rom_address().min(heap.len());
            let end = (start + ROM_SIZE).min(heap.len());
            heap[start..end].into()
        });
        Ok(rom)
    }

    /// Re-run the module's initialization, reloading the program.
    ///
    /// A failed reset is a load failure: the session moves to the failed state for good.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let module = self.module_mut()?;
        let result = module.init();
        self.table.take();
        self.rom.take();
        if let Err(error) = result {
            log::error!("Failed to reset emulator module: {}", error);
            self.lifecycle = Lifecycle::Failed(error.clone());
            return Err(SessionError::Load(error));
        }
        log::info!("Emulator module reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::DecodeError;
    use crate::module::faulty::{Fault, FaultyLoader, RESET_FAILURE};
    use crate::module::{RomLoader, RomModule};

    /// Counts how often the module is loaded.
    struct Counting {
        inner: RomLoader,
        calls: Rc<Cell<usize>>,
    }

    impl ModuleLoader for Counting {
        type Module = RomModule;

        fn load(&mut self) -> Result<RomModule, LoadError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.load()
        }
    }

    fn counting(image: Vec<u8>) -> (Session<Counting>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let loader = Counting {
            inner: RomLoader::new(image),
            calls: calls.clone(),
        };
        (Session::new(loader), calls)
    }

    fn program() -> Vec<u8> {
        let mut image = vec![0u8; ROM_SIZE];
        image[0x100..0x104].copy_from_slice(&[0x00, 0xc3, 0x50, 0x01]);
        image[0x150..0x156].copy_from_slice(&[0x3e, 0x2a, 0x06, 0x10, 0x18, 0xfe]);
        image
    }

    #[test]
    fn load_failure_is_persistent() {
        let (mut session, calls) = counting(Vec::new());
        let expected = SessionError::Load(LoadError::EmptyImage);
        assert_eq!(session.initialize(), Err(expected.clone()));
        assert_eq!(session.initialize(), Err(expected.clone()));
        assert_eq!(calls.get(), 1);
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.step(), Err(expected));
    }

    #[test]
    fn initialize_is_idempotent() {
        let (mut session, calls) = counting(program());
        assert_eq!(session.state(), SessionState::Unloaded);
        session.initialize().unwrap();
        session.step().unwrap();
        session.initialize().unwrap();
        assert_eq!(calls.get(), 1);
        // Not re-initialized by the second call
        assert_eq!(session.registers().unwrap().pc(), 0x101);
    }

    #[test]
    fn uninitialized_operations_fail() {
        let (mut session, calls) = counting(program());
        assert_eq!(session.step(), Err(SessionError::Uninitialized));
        assert_eq!(session.reset(), Err(SessionError::Uninitialized));
        assert!(session.registers().is_err());
        assert!(session.instruction_table().is_err());
        assert!(session.rom().is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn step_then_next_instruction() {
        let (mut session, _) = counting(program());
        session.initialize().unwrap();
        assert_eq!(session.next_instruction().unwrap().name, "NOP");

        session.step().unwrap();
        let next = session.next_instruction().unwrap();
        assert_eq!(next.name, "JP a16");
        assert_eq!(next.operand, 0x150);

        session.step().unwrap();
        assert_eq!(session.registers().unwrap().pc(), 0x150);
        let next = session.next_instruction().unwrap();
        assert_eq!(next.name, "LD A,d8");
        assert_eq!(next.operand, 0x2a);
    }

    #[test]
    fn table_is_memoized() {
        let (mut session, _) = counting(program());
        session.initialize().unwrap();
        let first = session.instruction_table().unwrap() as *const InstructionTable;
        let second = session.instruction_table().unwrap() as *const InstructionTable;
        assert_eq!(first, second);

        let table = session.instruction_table().unwrap();
        assert_eq!(table.get(0x101).unwrap().name, "JP a16");
        assert!(table.get(0x102).is_none());
        assert_eq!(table.get(0x150).unwrap().operand, 0x2a);
    }

    #[test]
    fn reset_restarts_program() {
        let (mut session, calls) = counting(program());
        session.initialize().unwrap();
        session.instruction_table().unwrap();
        assert!(session.table.get().is_some());
        session.step().unwrap();
        session.step().unwrap();

        session.reset().unwrap();
        assert!(session.table.get().is_none());
        assert!(session.rom.get().is_none());
        assert_eq!(session.registers().unwrap().pc(), 0x100);
        assert_eq!(calls.get(), 1);
        assert_eq!(session.instruction_table().unwrap().get(0x101).unwrap().opcode, 0xc3);
    }

    #[test]
    fn failed_reset_is_a_load_failure() {
        let mut session = Session::new(FaultyLoader::new(program(), Fault::FailingReset));
        session.initialize().unwrap();
        assert_eq!(session.instruction_table().unwrap().get(0x101).unwrap().opcode, 0xc3);
        assert_eq!(session.rom().unwrap()[0x101], 0xc3);

        let expected = SessionError::Load(LoadError::Module {
            reason: RESET_FAILURE.to_string(),
        });
        assert_eq!(session.reset(), Err(expected.clone()));
        assert_eq!(session.state(), SessionState::Failed);
        // Nothing describes the wiped image any more
        assert!(session.table.get().is_none());
        assert!(session.rom.get().is_none());
        assert_eq!(session.step(), Err(expected.clone()));
        assert_eq!(session.instruction_table().err(), Some(expected.clone()));
        assert_eq!(session.initialize(), Err(expected));
    }

    #[test]
    fn wide_operand_fails_the_scan() {
        let mut image = program();
        image[0x200] = 0xd3;
        let mut session = Session::new(FaultyLoader::new(image, Fault::WideOperand(0xd3)));
        session.initialize().unwrap();
        assert_eq!(
            session.instruction_table().err(),
            Some(SessionError::Decode(DecodeError::InvalidOperandSize {
                address: 0x200,
                opcode: 0xd3,
                size: 3,
            }))
        );
        // Not memoized, so the failure repeats
        assert!(session.table.get().is_none());
        assert!(session.instruction_table().is_err());
    }

    #[test]
    fn rom_segment() {
        let (mut session, _) = counting(program());
        session.initialize().unwrap();
        let rom = session.rom().unwrap();
        assert_eq!(rom.len(), ROM_SIZE);
        assert_eq!(&rom[0x150..0x152], &[0x3e, 0x2a]);
    }
}
