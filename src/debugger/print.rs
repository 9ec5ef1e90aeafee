use crate::decoder::{Instruction, InstructionTable};
use crate::output::{debugger_colors, Output};
use crate::registers::{get_bit, Flag, RegisterView};
use crate::{dprint, dprintln};

/// Inner width of the register box.
const PANEL_WIDTH: usize = 30;
/// Bytes per ROM dump row.
const DUMP_WIDTH: usize = 16;

pub fn registers(view: &RegisterView) {
    dprintln!(Sometimes, Info, "Registers:");
    let flags = flags(view.f());

    if Output::is_minimal() {
        dprintln!(Always, Normal, "AF 0x{:04x}", view.af());
        dprintln!(Always, Normal, "BC 0x{:04x}", view.bc());
        dprintln!(Always, Normal, "DE 0x{:04x}", view.de());
        dprintln!(Always, Normal, "HL 0x{:04x}", view.hl());
        dprintln!(Always, Normal, "SP 0x{:04x}", view.sp());
        dprintln!(Always, Normal, "PC 0x{:04x}", view.pc());
        dprintln!(Always, Normal, "{}", flags);
        return;
    }

    #[rustfmt::skip]
    let lines = [
        format!("AF 0x{:04x}   A 0x{:02x}  F 0x{:02x}", view.af(), view.a(), view.f()),
        format!("BC 0x{:04x}   B 0x{:02x}  C 0x{:02x}", view.bc(), view.b(), view.c()),
        format!("DE 0x{:04x}   D 0x{:02x}  E 0x{:02x}", view.de(), view.d(), view.e()),
        format!("HL 0x{:04x}   H 0x{:02x}  L 0x{:02x}", view.hl(), view.h(), view.l()),
        format!("SP 0x{:04x}  PC 0x{:04x}", view.sp(), view.pc()),
        flags,
    ];
    dprintln!(
        Always,
        Normal,
        "\x1b[{dim}m┌{}┐\x1b[0m",
        "─".repeat(PANEL_WIDTH + 2),
        dim = debugger_colors::DIM,
    );
    for line in lines {
        dprintln!(
            Always,
            Normal,
            "\x1b[{dim}m│\x1b[0m {:<width$} \x1b[{dim}m│\x1b[0m",
            line,
            width = PANEL_WIDTH,
            dim = debugger_colors::DIM,
        );
    }
    dprintln!(
        Always,
        Normal,
        "\x1b[{dim}m└{}┘\x1b[0m",
        "─".repeat(PANEL_WIDTH + 2),
        dim = debugger_colors::DIM,
    );
}

fn flags(f: u8) -> String {
    Flag::ALL
        .iter()
        .map(|flag| format!("{}={}", flag.letter(), get_bit(f, flag.bit())))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn next_instruction(pc: u16, instruction: &Instruction) {
    dprintln!(Sometimes, Info, "Next instruction:");
    dprintln!(Always, Normal, "{}", row(pc, instruction));
}

/// One line per auto-run tick.
pub fn tick(pc: u16, instruction: &Instruction) {
    dprint!(Sometimes, Info, "» ");
    dprintln!(Always, Normal, "{}", row(pc, instruction));
}

/// Window of the instruction table, with the row at `pc` highlighted.
pub fn instruction_list(table: &InstructionTable, pc: u16, rows: usize) {
    dprintln!(Sometimes, Info, "Instructions:");
    if table.get(pc).is_none() {
        dprintln!(
            Sometimes,
            Info,
            "(Program counter 0x{:04x} is not at a decoded instruction.)",
            pc
        );
    }
    for (address, instruction) in table.window(pc, rows) {
        if address == pc {
            dprintln!(
                Always,
                Normal,
                "\x1b[{}m> {}\x1b[0m",
                debugger_colors::HIGHLIGHT,
                row(address, instruction)
            );
        } else {
            dprintln!(Always, Normal, "  {}", row(address, instruction));
        }
    }
}

/// Hex dump of `count` bytes from `address`, clamped to the segment.
pub fn rom(rom: &[u8], address: u16, count: u16) {
    let start = (address as usize).min(rom.len());
    let end = (start + count as usize).min(rom.len());
    if start == end {
        dprintln!(Always, Error, "Address 0x{:04x} is outside of ROM.", address);
        return;
    }
    dprintln!(Sometimes, Info, "ROM 0x{:04x}..0x{:04x}:", start, end);
    for (i, chunk) in rom[start..end].chunks(DUMP_WIDTH).enumerate() {
        dprintln!(
            Always,
            Normal,
            "{}",
            dump_row(start + i * DUMP_WIDTH, chunk)
        );
    }
}

fn row(address: u16, instruction: &Instruction) -> String {
    format!(
        "0x{:04x}  {:02x}  {}",
        address, instruction.opcode, instruction
    )
}

fn dump_row(address: usize, bytes: &[u8]) -> String {
    let hex: Vec<String> = bytes.iter().map(|byte| format!("{:02x}", byte)).collect();
    format!("0x{:04x}  {}", address, hex.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::OperandSize;

    #[test]
    fn rows() {
        let instruction = Instruction {
            opcode: 0x3e,
            name: "LD A,d8".to_string(),
            operand: 0x2a,
            operand_size: OperandSize::One,
        };
        assert_eq!(row(0x150, &instruction), "0x0150  3e  LD A,d8 ; $2a");
        assert_eq!(dump_row(0x150, &[0x3e, 0x2a, 0x00]), "0x0150  3e 2a 00");
    }

    #[test]
    fn flag_summary() {
        assert_eq!(flags(0xb0), "Z=1 N=0 H=1 C=1");
        assert_eq!(flags(0x40), "Z=0 N=1 H=0 C=0");
    }
}
