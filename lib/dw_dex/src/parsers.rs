//! Textual parsers for type descriptors and register-only instructions,
//! e.g. `aput-byte v2, v0, v1`.

use crate::errors::{DexError, DexResult};
use crate::instrs::LabeledInstr;
use crate::registers::Reg;
use crate::types::Type;
use crate::Addr;
use nom::branch::alt;
use nom::bytes::complete::{take_till1, take_while1};
use nom::character::complete::{char, digit1, one_of, space0, space1};
use nom::combinator::{all_consuming, map_res, recognize};
use nom::multi::{many0_count, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::{Finish, IResult};

/// Parses a Dalvik type descriptor at the beginning of the input.
pub fn type_descriptor(input: &str) -> IResult<&str, Type, DexError> {
    map_res(
        recognize(pair(
            many0_count(char('[')),
            alt((
                recognize(one_of("VZBSCIJFD")),
                recognize(tuple((char('L'), take_till1(|c| c == ';'), char(';')))),
            )),
        )),
        Type::try_from,
    )(input)
}

/// Parses a register operand, either `vN` or `rN`.
pub fn register(input: &str) -> IResult<&str, Reg, DexError> {
    map_res(preceded(one_of("vr"), digit1), |n: &str| {
        n.parse::<u16>().map(Reg::from)
    })(input)
}

fn mnemonic(input: &str) -> IResult<&str, &str, DexError> {
    take_while1(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '/')(
        input,
    )
}

fn register_instr(input: &str) -> IResult<&str, (&str, Vec<Reg>), DexError> {
    delimited(
        space0,
        pair(
            terminated(mnemonic, space1),
            separated_list1(tuple((space0, char(','), space0)), register),
        ),
        space0,
    )(input)
}

/// Parses a whole type descriptor string.
pub fn parse_type(input: &str) -> DexResult<Type> {
    let (_, typ) = all_consuming(type_descriptor)(input).finish()?;
    Ok(typ)
}

/// Parses an instruction whose operands are only registers (formats 11x, 12x and 23x)
/// and labels it with the given address.
pub fn parse_instr(addr: Addr, input: &str) -> DexResult<LabeledInstr> {
    let (_, (mnemonic, regs)) = all_consuming(register_instr)(input).finish()?;
    let size = match regs.len() {
        1 | 2 => 1,
        3 => 2,
        _ => return Err(DexError::BadInstructionSize),
    };
    log::trace!("parsed {mnemonic} ({size} code units) at {addr}");
    Ok(LabeledInstr::new(addr, mnemonic, size, regs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrs::Instruction;

    #[test]
    fn type_descriptor_parser() {
        assert_eq!(parse_type("[B").unwrap(), Type::Array(1, Box::new(Type::Byte)));
        assert_eq!(
            type_descriptor("[Ljava/lang/String;:4").unwrap(),
            (
                ":4",
                Type::Array(1, Box::new(Type::Class("java/lang/String".to_string())))
            )
        );
        assert!(parse_type("[Ljava/lang/String").is_err());
        assert!(parse_type("II").is_err());
    }

    #[test]
    fn register_parser() {
        assert_eq!(register("v12").unwrap().1, Reg::from(12u8));
        assert_eq!(register("r0,").unwrap(), (",", Reg::from(0u8)));
        assert!(register("p1").is_err());
        assert!(register("v70000").is_err());
    }

    #[test]
    fn instr_23x_parser() {
        let instr = parse_instr(Addr(4), "aput-byte v2, v0, v1").unwrap();
        assert_eq!(instr.mnemonic(), "aput-byte");
        assert_eq!(instr.size(), 2);
        assert_eq!(
            instr.regs(),
            &[Reg::from(2u8), Reg::from(0u8), Reg::from(1u8)]
        );
        assert_eq!(instr.next_addr(), Addr(6));
        assert_eq!(format!("{instr}"), "aput-byte v2, v0, v1");
    }

    #[test]
    fn instr_parser_spacing() {
        let instr = parse_instr(Addr::entry(), "  aput r3,r4 ,  r5 ").unwrap();
        assert_eq!(instr.mnemonic(), "aput");
        assert_eq!(instr.regs().len(), 3);
    }

    #[test]
    fn instr_parser_errors() {
        assert!(parse_instr(Addr(0), "aput-byte").is_err());
        assert!(parse_instr(Addr(0), "aput v0, v1, #2").is_err());
        assert!(matches!(
            parse_instr(Addr(0), "aput v0, v1, v2, v3"),
            Err(DexError::BadInstructionSize)
        ));
    }
}
