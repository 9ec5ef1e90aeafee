use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::DecodeError;
use crate::module::EmulatorModule;

/// First address of the scanned ROM range.
pub const SCAN_START: u16 = 0x0101;
/// Last address of the scanned ROM range (inclusive).
pub const SCAN_END: u16 = 0x7FFF;

/// Width of an instruction's operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSize {
    Zero,
    One,
    Two,
}

impl OperandSize {
    pub fn bytes(self) -> u16 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for OperandSize {
    type Error = u8;
    fn try_from(size: u8) -> Result<Self, Self::Error> {
        match size {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(size),
        }
    }
}

/// One decoded memory location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub name: String,
    /// Raw operand value. `0` when there is no operand.
    pub operand: u16,
    pub operand_size: OperandSize,
}

impl Instruction {
    /// Total length in bytes, including the opcode.
    pub fn width(&self) -> u16 {
        1 + self.operand_size.bytes()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match self.operand_size {
            OperandSize::Zero => Ok(()),
            OperandSize::One => write!(f, " ; ${:02x}", self.operand),
            OperandSize::Two => write!(f, " ; ${:04x}", self.operand),
        }
    }
}

/// Instructions of one program image, keyed by address.
///
/// Only valid for the memory image it was scanned from.
#[derive(Debug, Default)]
pub struct InstructionTable {
    entries: BTreeMap<u16, Instruction>,
}

impl InstructionTable {
    pub fn get(&self, address: u16) -> Option<&Instruction> {
        self.entries.get(&address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &Instruction)> {
        self.entries.iter().map(|(address, instr)| (*address, instr))
    }

    /// Up to `rows` consecutive entries, with the entry at or after `address` roughly centred.
    pub fn window(&self, address: u16, rows: usize) -> Vec<(u16, &Instruction)> {
        if rows == 0 {
            return Vec::new();
        }
        let after: Vec<_> = self
            .entries
            .range(address..)
            .take(rows)
            .map(|(address, instr)| (*address, instr))
            .collect();
        let wanted_before = (rows / 2).max(rows - after.len());
        let mut before: Vec<_> = self
            .entries
            .range(..address)
            .rev()
            .take(wanted_before)
            .map(|(address, instr)| (*address, instr))
            .collect();
        before.reverse();

        let take_after = rows - before.len().min(rows);
        before.extend(after.into_iter().take(take_after));
        before
    }
}

/// Decode the instruction starting at `address`.
pub fn decode_at<M>(module: &M, address: u16) -> Result<Instruction, DecodeError>
where
    M: EmulatorModule + ?Sized,
{
    let opcode = module.opcode_at(address);
    let size = module.operand_size(opcode);
    let operand_size =
        OperandSize::try_from(size).map_err(|size| DecodeError::InvalidOperandSize {
            address,
            opcode,
            size,
        })?;
    Ok(Instruction {
        opcode,
        name: module.string_at(module.name_at(address)),
        operand: mask_operand(module.operand_at(address), operand_size),
        operand_size,
    })
}

/// Decode the instruction at the program counter.
pub fn decode_next<M>(module: &M, pc: u16) -> Result<Instruction, DecodeError>
where
    M: EmulatorModule + ?Sized,
{
    let opcode = module.next_opcode();
    let size = module.operand_size(opcode);
    let operand_size =
        OperandSize::try_from(size).map_err(|size| DecodeError::InvalidOperandSize {
            address: pc,
            opcode,
            size,
        })?;
    Ok(Instruction {
        opcode,
        name: module.string_at(module.next_name()),
        operand: mask_operand(module.next_operand(), operand_size),
        operand_size,
    })
}

fn mask_operand(operand: u16, size: OperandSize) -> u16 {
    match size {
        OperandSize::Zero => 0,
        OperandSize::One => operand & 0xFF,
        OperandSize::Two => operand,
    }
}

/// Linearly decode every instruction in `range`.
///
/// Each instruction consumes `1 + operand_size` bytes. Scanning stops once the cursor passes
/// the end of the range; an instruction may start at the last address and extend past it.
pub fn scan<M>(module: &M, range: RangeInclusive<u16>) -> Result<InstructionTable, DecodeError>
where
    M: EmulatorModule + ?Sized,
{
    let mut entries = BTreeMap::new();
    // Wider than an address, so the cursor cannot wrap past `0xFFFF`
    let mut cursor = *range.start() as u32;
    let end = *range.end() as u32;
    while cursor <= end {
        let address = cursor as u16;
        let instr = decode_at(module, address)?;
        cursor += instr.width() as u32;
        entries.insert(address, instr);
    }
    Ok(InstructionTable { entries })
}

/// Decode the fixed ROM range.
pub fn scan_rom<M>(module: &M) -> Result<InstructionTable, DecodeError>
where
    M: EmulatorModule + ?Sized,
{
    scan(module, SCAN_START..=SCAN_END)
}
