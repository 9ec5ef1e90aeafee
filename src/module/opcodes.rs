/// One entry of the opcode table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Op {
    /// Mnemonic with operand placeholders (`d8`, `d16`, `a8`, `a16`, `r8`).
    pub name: &'static str,
    /// Operand width in bytes.
    pub operand_size: u8,
}

const fn op(name: &'static str, operand_size: u8) -> Op {
    Op { name, operand_size }
}

/// Unprefixed SM83 opcodes.
///
/// `PREFIX CB` carries its second byte as a one-byte operand, so the extended opcode is never
/// decoded as an instruction of its own. `STOP` likewise swallows its padding byte.
#[rustfmt::skip]
pub const OPS: [Op; 256] = [
    /* 0x00 */ op("NOP", 0),
    /* 0x01 */ op("LD BC,d16", 2),
    /* 0x02 */ op("LD (BC),A", 0),
    /* 0x03 */ op("INC BC", 0),
    /* 0x04 */ op("INC B", 0),
    /* 0x05 */ op("DEC B", 0),
    /* 0x06 */ op("LD B,d8", 1),
    /* 0x07 */ op("RLCA", 0),
    /* 0x08 */ op("LD (a16),SP", 2),
    /* 0x09 */ op("ADD HL,BC", 0),
    /* 0x0a */ op("LD A,(BC)", 0),
    /* 0x0b */ op("DEC BC", 0),
    /* 0x0c */ op("INC C", 0),
    /* 0x0d */ op("DEC C", 0),
    /* 0x0e */ op("LD C,d8", 1),
    /* 0x0f */ op("RRCA", 0),
    /* 0x10 */ op("STOP d8", 1),
    /* 0x11 */ op("LD DE,d16", 2),
    /* 0x12 */ op("LD (DE),A", 0),
    /* 0x13 */ op("INC DE", 0),
    /* 0x14 */ op("INC D", 0),
    /* 0x15 */ op("DEC D", 0),
    /* 0x16 */ op("LD D,d8", 1),
    /* 0x17 */ op("RLA", 0),
    /* 0x18 */ op("JR r8", 1),
    /* 0x19 */ op("ADD HL,DE", 0),
    /* 0x1a */ op("LD A,(DE)", 0),
    /* 0x1b */ op("DEC DE", 0),
    /* 0x1c */ op("INC E", 0),
    /* 0x1d */ op("DEC E", 0),
    /* 0x1e */ op("LD E,d8", 1),
    /* 0x1f */ op("RRA", 0),
    /* 0x20 */ op("JR NZ,r8", 1),
    /* 0x21 */ op("LD HL,d16", 2),
    /* 0x22 */ op("LD (HL+),A", 0),
    /* 0x23 */ op("INC HL", 0),
    /* 0x24 */ op("INC H", 0),
    /* 0x25 */ op("DEC H", 0),
    /* 0x26 */ op("LD H,d8", 1),
    /* 0x27 */ op("DAA", 0),
    /* 0x28 */ op("JR Z,r8", 1),
    /* 0x29 */ op("ADD HL,HL", 0),
    /* 0x2a */ op("LD A,(HL+)", 0),
    /* 0x2b */ op("DEC HL", 0),
    /* 0x2c */ op("INC L", 0),
    /* 0x2d */ op("DEC L", 0),
    /* 0x2e */ op("LD L,d8", 1),
    /* 0x2f */ op("CPL", 0),
    /* 0x30 */ op("JR NC,r8", 1),
    /* 0x31 */ op("LD SP,d16", 2),
    /* 0x32 */ op("LD (HL-),A", 0),
    /* 0x33 */ op("INC SP", 0),
    /* 0x34 */ op("INC (HL)", 0),
    /* 0x35 */ op("DEC (HL)", 0),
    /* 0x36 */ op("LD (HL),d8", 1),
    /* 0x37 */ op("SCF", 0),
    /* 0x38 */ op("JR C,r8", 1),
    /* 0x39 */ op("ADD HL,SP", 0),
    /* 0x3a */ op("LD A,(HL-)", 0),
    /* 0x3b */ op("DEC SP", 0),
    /* 0x3c */ op("INC A", 0),
    /* 0x3d */ op("DEC A", 0),
    /* 0x3e */ op("LD A,d8", 1),
    /* 0x3f */ op("CCF", 0),
    /* 0x40 */ op("LD B,B", 0),
    /* 0x41 */ op("LD B,C", 0),
    /* 0x42 */ op("LD B,D", 0),
    /* 0x43 */ op("LD B,E", 0),
    /* 0x44 */ op("LD B,H", 0),
    /* 0x45 */ op("LD B,L", 0),
    /* 0x46 */ op("LD B,(HL)", 0),
    /* 0x47 */ op("LD B,A", 0),
    /* 0x48 */ op("LD C,B", 0),
    /* 0x49 */ op("LD C,C", 0),
    /* 0x4a */ op("LD C,D", 0),
    /* 0x4b */ op("LD C,E", 0),
    /* 0x4c */ op("LD C,H", 0),
    /* 0x4d */ op("LD C,L", 0),
    /* 0x4e */ op("LD C,(HL)", 0),
    /* 0x4f */ op("LD C,A", 0),
    /* 0x50 */ op("LD D,B", 0),
    /* 0x51 */ op("LD D,C", 0),
    /* 0x52 */ op("LD D,D", 0),
    /* 0x53 */ op("LD D,E", 0),
    /* 0x54 */ op("LD D,H", 0),
    /* 0x55 */ op("LD D,L", 0),
    /* 0x56 */ op("LD D,(HL)", 0),
    /* 0x57 */ op("LD D,A", 0),
    /* 0x58 */ op("LD E,B", 0),
    /* 0x59 */ op("LD E,C", 0),
    /* 0x5a */ op("LD E,D", 0),
    /* 0x5b */ op("LD E,E", 0),
    /* 0x5c */ op("LD E,H", 0),
    /* 0x5d */ op("LD E,L", 0),
    /* 0x5e */ op("LD E,(HL)", 0),
    /* 0x5f */ op("LD E,A", 0),
    /* 0x60 */ op("LD H,B", 0),
    /* 0x61 */ op("LD H,C", 0),
    /* 0x62 */ op("LD H,D", 0),
    /* 0x63 */ op("LD H,E", 0),
    /* 0x64 */ op("LD H,H", 0),
    /* 0x65 */ op("LD H,L", 0),
    /* 0x66 */ op("LD H,(HL)", 0),
    /* 0x67 */ op("LD H,A", 0),
    /* 0x68 */ op("LD L,B", 0),
    /* 0x69 */ op("LD L,C", 0),
    /* 0x6a */ op("LD L,D", 0),
    /* 0x6b */ op("LD L,E", 0),
    /* 0x6c */ op("LD L,H", 0),
    /* 0x6d */ op("LD L,L", 0),
    /* 0x6e */ op("LD L,(HL)", 0),
    /* 0x6f */ op("LD L,A", 0),
    /* 0x70 */ op("LD (HL),B", 0),
    /* 0x71 */ op("LD (HL),C", 0),
    /* 0x72 */ op("LD (HL),D", 0),
    /* 0x73 */ op("LD (HL),E", 0),
    /* 0x74 */ op("LD (HL),H", 0),
    /* 0x75 */ op("LD (HL),L", 0),
    /* 0x76 */ op("HALT", 0),
    /* 0x77 */ op("LD (HL),A", 0),
    /* 0x78 */ op("LD A,B", 0),
    /* 0x79 */ op("LD A,C", 0),
    /* 0x7a */ op("LD A,D", 0),
    /* 0x7b */ op("LD A,E", 0),
    /* 0x7c */ op("LD A,H", 0),
    /* 0x7d */ op("LD A,L", 0),
    /* 0x7e */ op("LD A,(HL)", 0),
    /* 0x7f */ op("LD A,A", 0),
    /* 0x80 */ op("ADD A,B", 0),
    /* 0x81 */ op("ADD A,C", 0),
    /* 0x82 */ op("ADD A,D", 0),
    /* 0x83 */ op("ADD A,E", 0),
    /* 0x84 */ op("ADD A,H", 0),
    /* 0x85 */ op("ADD A,L", 0),
    /* 0x86 */ op("ADD A,(HL)", 0),
    /* 0x87 */ op("ADD A,A", 0),
    /* 0x88 */ op("ADC A,B", 0),
    /* 0x89 */ op("ADC A,C", 0),
    /* 0x8a */ op("ADC A,D", 0),
    /* 0x8b */ op("ADC A,E", 0),
    /* 0x8c */ op("ADC A,H", 0),
    /* 0x8d */ op("ADC A,L", 0),
    /* 0x8e */ op("ADC A,(HL)", 0),
    /* 0x8f */ op("ADC A,A", 0),
    /* 0x90 */ op("SUB B", 0),
    /* 0x91 */ op("SUB C", 0),
    /* 0x92 */ op("SUB D", 0),
    /* 0x93 */ op("SUB E", 0),
    /* 0x94 */ op("SUB H", 0),
    /* 0x95 */ op("SUB L", 0),
    /* 0x96 */ op("SUB (HL)", 0),
    /* 0x97 */ op("SUB A", 0),
    /* 0x98 */ op("SBC A,B", 0),
    /* 0x99 */ op("SBC A,C", 0),
    /* 0x9a */ op("SBC A,D", 0),
    /* 0x9b */ op("SBC A,E", 0),
    /* 0x9c */ op("SBC A,H", 0),
    /* 0x9d */ op("SBC A,L", 0),
    /* 0x9e */ op("SBC A,(HL)", 0),
    /* 0x9f */ op("SBC A,A", 0),
    /* 0xa0 */ op("AND B", 0),
    /* 0xa1 */ op("AND C", 0),
    /* 0xa2 */ op("AND D", 0),
    /* 0xa3 */ op("AND E", 0),
    /* 0xa4 */ op("AND H", 0),
    /* 0xa5 */ op("AND L", 0),
    /* 0xa6 */ op("AND (HL)", 0),
    /* 0xa7 */ op("AND A", 0),
    /* 0xa8 */ op("XOR B", 0),
    /* 0xa9 */ op("XOR C", 0),
    /* 0xaa */ op("XOR D", 0),
    /* 0xab */ op("XOR E", 0),
    /* 0xac */ op("XOR H", 0),
    /* 0xad */ op("XOR L", 0),
    /* 0xae */ op("XOR (HL)", 0),
    /* 0xaf */ op("XOR A", 0),
    /* 0xb0 */ op("OR B", 0),
    /* 0xb1 */ op("OR C", 0),
    /* 0xb2 */ op("OR D", 0),
    /* 0xb3 */ op("OR E", 0),
    /* 0xb4 */ op("OR H", 0),
    /* 0xb5 */ op("OR L", 0),
    /* 0xb6 */ op("OR (HL)", 0),
    /* 0xb7 */ op("OR A", 0),
    /* 0xb8 */ op("CP B", 0),
    /* 0xb9 */ op("CP C", 0),
    /* 0xba */ op("CP D", 0),
    /* 0xbb */ op("CP E", 0),
    /* 0xbc */ op("CP H", 0),
    /* 0xbd */ op("CP L", 0),
    /* 0xbe */ op("CP (HL)", 0),
    /* 0xbf */ op("CP A", 0),
    /* 0xc0 */ op("RET NZ", 0),
    /* 0xc1 */ op("POP BC", 0),
    /* 0xc2 */ op("JP NZ,a16", 2),
    /* 0xc3 */ op("JP a16", 2),
    /* 0xc4 */ op("CALL NZ,a16", 2),
    /* 0xc5 */ op("PUSH BC", 0),
    /* 0xc6 */ op("ADD A,d8", 1),
    /* 0xc7 */ op("RST 00H", 0),
    /* 0xc8 */ op("RET Z", 0),
    /* 0xc9 */ op("RET", 0),
    /* 0xca */ op("JP Z,a16", 2),
    /* 0xcb */ op("PREFIX CB", 1),
    /* 0xcc */ op("CALL Z,a16", 2),
    /* 0xcd */ op("CALL a16", 2),
    /* 0xce */ op("ADC A,d8", 1),
    /* 0xcf */ op("RST 08H", 0),
    /* 0xd0 */ op("RET NC", 0),
    /* 0xd1 */ op("POP DE", 0),
    /* 0xd2 */ op("JP NC,a16", 2),
    /* 0xd3 */ op("UNDEFINED", 0),
    /* 0xd4 */ op("CALL NC,a16", 2),
    /* 0xd5 */ op("PUSH DE", 0),
    /* 0xd6 */ op("SUB d8", 1),
    /* 0xd7 */ op("RST 10H", 0),
    /* 0xd8 */ op("RET C", 0),
    /* 0xd9 */ op("RETI", 0),
    /* 0xda */ op("JP C,a16", 2),
    /* 0xdb */ op("UNDEFINED", 0),
    /* 0xdc */ op("CALL C,a16", 2),
    /* 0xdd */ op("UNDEFINED", 0),
    /* 0xde */ op("SBC A,d8", 1),
    /* 0xdf */ op("RST 18H", 0),
    /* 0xe0 */ op("LDH (a8),A", 1),
    /* 0xe1 */ op("POP HL", 0),
    /* 0xe2 */ op("LD (C),A", 0),
    /* 0xe3 */ op("UNDEFINED", 0),
    /* 0xe4 */ op("UNDEFINED", 0),
    /* 0xe5 */ op("PUSH HL", 0),
    /* 0xe6 */ op("AND d8", 1),
    /* 0xe7 */ op("RST 20H", 0),
    /* 0xe8 */ op("ADD SP,r8", 1),
    /* 0xe9 */ op("JP (HL)", 0),
    /* 0xea */ op("LD (a16),A", 2),
    /* 0xeb */ op("UNDEFINED", 0),
    /* 0xec */ op("UNDEFINED", 0),
    /* 0xed */ op("UNDEFINED", 0),
    /* 0xee */ op("XOR d8", 1),
    /* 0xef */ op("RST 28H", 0),
    /* 0xf0 */ op("LDH A,(a8)", 1),
    /* 0xf1 */ op("POP AF", 0),
    /* 0xf2 */ op("LD A,(C)", 0),
    /* 0xf3 */ op("DI", 0),
    /* 0xf4 */ op("UNDEFINED", 0),
    /* 0xf5 */ op("PUSH AF", 0),
    /* 0xf6 */ op("OR d8", 1),
    /* 0xf7 */ op("RST 30H", 0),
    /* 0xf8 */ op("LD HL,SP+r8", 1),
    /* 0xf9 */ op("LD SP,HL", 0),
    /* 0xfa */ op("LD A,(a16)", 2),
    /* 0xfb */ op("EI", 0),
    /* 0xfc */ op("UNDEFINED", 0),
    /* 0xfd */ op("UNDEFINED", 0),
    /* 0xfe */ op("CP d8", 1),
    /* 0xff */ op("RST 38H", 0),
];
