//! Parsers for the register literals given on the command line, e.g.
//! `v0=array:[B:8` or `v3=int:-1`.

use crate::prelude::*;
use dw_dex::errors::DexError;
use dw_dex::{register, type_descriptor};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, map_res, opt, recognize, value};
use nom::sequence::{pair, preceded, separated_pair, terminated};
use nom::{Finish, IResult};
use std::collections::BTreeMap;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Value(AbstractValue),
    Array(Type, usize),
    Object(Type),
    /// The value of another register.
    Alias(Reg),
}

impl Literal {
    /// Builds the abstract value of the literal, allocating heap objects
    /// when needed. Aliases are looked up in the already `assigned` registers.
    pub fn resolve(self, assigned: &BTreeMap<Reg, AbstractValue>) -> DwResult<AbstractValue> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Array(typ, length) => Ok(ArrayHandle::allocate(typ, length)?.into()),
            Self::Object(typ) => Ok(ObjectHandle::new(typ)?.into()),
            Self::Alias(src) => assigned
                .get(&src)
                .cloned()
                .ok_or_else(|| DwError::BadArguments(format!("register {src} is not assigned yet"))),
        }
    }
}

fn integer<T: FromStr<Err = ParseIntError>>(input: &str) -> IResult<&str, T, DexError> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<T>)(input)
}

fn boolean(input: &str) -> IResult<&str, bool, DexError> {
    alt((value(true, tag("true")), value(false, tag("false"))))(input)
}

fn primitive(input: &str) -> IResult<&str, AbstractValue, DexError> {
    alt((
        map(preceded(tag("int:"), integer::<i32>), AbstractValue::Int32),
        map(preceded(tag("long:"), integer::<i64>), AbstractValue::Int64),
        map(preceded(tag("bool:"), boolean), AbstractValue::Bool),
        map(preceded(tag("byte:"), integer::<i8>), AbstractValue::Byte),
        map(preceded(tag("char:"), integer::<u16>), AbstractValue::Char),
        map(preceded(tag("short:"), integer::<i16>), AbstractValue::Short),
        value(AbstractValue::Null, tag("null")),
        map(preceded(tag("unknown:"), type_descriptor), |t| {
            AbstractValue::unknown_of(&t)
        }),
    ))(input)
}

pub fn literal(input: &str) -> IResult<&str, Literal, DexError> {
    alt((
        map(primitive, Literal::Value),
        map(
            preceded(
                tag("array:"),
                separated_pair(type_descriptor, char(':'), integer::<usize>),
            ),
            |(typ, length)| Literal::Array(typ, length),
        ),
        map(preceded(tag("object:"), type_descriptor), Literal::Object),
        map(register, Literal::Alias),
    ))(input)
}

/// Parses a whole `vN=<literal>` register assignment.
pub fn parse_assignment(input: &str) -> DwResult<(Reg, Literal)> {
    let (_, assignment) =
        all_consuming(pair(terminated(register, char('=')), literal))(input).finish()?;
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Literal {
        parse_assignment(input).unwrap().1
    }

    #[test]
    fn primitives() {
        assert_eq!(
            parse_assignment("v3=int:-12").unwrap(),
            (Reg::from(3u8), Literal::Value(AbstractValue::Int32(-12)))
        );
        assert_eq!(
            parse("v0=long:4294967296"),
            Literal::Value(AbstractValue::Int64(0x1_0000_0000))
        );
        assert_eq!(parse("v0=bool:true"), Literal::Value(AbstractValue::Bool(true)));
        assert_eq!(parse("v0=byte:-128"), Literal::Value(AbstractValue::Byte(-128)));
        assert_eq!(parse("v0=char:65"), Literal::Value(AbstractValue::Char(0x41)));
        assert_eq!(parse("v0=short:300"), Literal::Value(AbstractValue::Short(300)));
        assert_eq!(parse("v0=null"), Literal::Value(AbstractValue::Null));
    }

    #[test]
    fn references() {
        assert_eq!(
            parse("v1=array:[Ljava/lang/String;:3"),
            Literal::Array(parse_type("[Ljava/lang/String;"), 3)
        );
        assert_eq!(
            parse("v1=object:Ljava/lang/Integer;"),
            Literal::Object(parse_type("Ljava/lang/Integer;"))
        );
        assert_eq!(
            parse("v1=unknown:[I"),
            Literal::Value(AbstractValue::unknown("[I"))
        );
        assert_eq!(parse("v1=v0"), Literal::Alias(Reg::from(0u8)));
    }

    fn parse_type(descriptor: &str) -> Type {
        dw_dex::parse_type(descriptor).unwrap()
    }

    #[test]
    fn rejected() {
        for bad in [
            "v0=byte:128",
            "v0=char:-1",
            "v0=int:",
            "v0=bool:yes",
            "v0=array:[I",
            "v0=array:I:-1",
            "v0=float:1",
            "v0 = int:1",
            "v0=int:1 ",
            "0=int:1",
        ] {
            assert!(parse_assignment(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn resolution() {
        let mut assigned = BTreeMap::new();
        let array = parse("v0=array:[B:4").resolve(&assigned).unwrap();
        assert_eq!(array.type_descriptor(), "[B");
        assert_eq!(array.as_array().unwrap().len(), 4);
        assigned.insert(Reg::from(0u8), array.clone());

        let alias = parse("v1=v0").resolve(&assigned).unwrap();
        assert!(alias.as_array().unwrap().ptr_eq(array.as_array().unwrap()));
        assert!(parse("v1=v7").resolve(&assigned).is_err());

        // arrays of non-array types cannot be allocated
        assert!(parse("v2=array:I:4").resolve(&assigned).is_err());
        assert!(parse("v2=object:[I").resolve(&assigned).is_err());
    }
}
