mod literals;

use crate::prelude::*;
use clap::ArgMatches;
use std::collections::BTreeMap;
use std::fmt;

pub use literals::{parse_assignment, Literal};

pub fn run(args: &ArgMatches) -> DwResult<()> {
    init_logger(args);

    let text = args
        .get_one::<String>("instr")
        .ok_or_else(|| DwError::BadArguments("--instr needed".to_string()))?;
    let addr = args.get_one::<usize>("addr").copied().map_or(Addr::entry(), Addr);

    let mut hierarchy = Hierarchy::new();
    for entry in args.get_many::<String>("class").into_iter().flatten() {
        register_class(&mut hierarchy, entry)?;
    }
    log::debug!("{} classes in hierarchy", hierarchy.nb_classes());

    let assignments = args.get_many::<String>("register").into_iter().flatten();
    let mut state = build_state(assignments.map(String::as_str))?;

    let successors = dw_symex::execute_text(addr, text, &mut state, &hierarchy)?;
    print!("{}", Report::new(&state, &successors));
    Ok(())
}

/// Builds a method state from `vN=<literal>` assignments.
///
/// Assignments are processed in order, so that a register can alias one that
/// was assigned before it. Every register of the resulting frame, from `v0` to
/// the highest assigned one, must be assigned exactly once.
pub fn build_state<'a, I>(assignments: I) -> DwResult<MethodState>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut values: BTreeMap<Reg, AbstractValue> = BTreeMap::new();
    for text in assignments {
        let (reg, literal) = parse_assignment(text)?;
        let value = literal.resolve(&values)?;
        log::trace!("{reg} <- {value}");
        if values.insert(reg, value).is_some() {
            return Err(DwError::BadArguments(format!(
                "register {reg} assigned more than once"
            )));
        }
    }

    let mut registers = Vec::with_capacity(values.len());
    for (expected, (reg, value)) in values.into_iter().enumerate() {
        if reg.index() != expected {
            return Err(DwError::BadArguments(format!(
                "register v{expected} is not assigned"
            )));
        }
        registers.push(value);
    }
    Ok(MethodState::new(registers))
}

fn class_name(name: &str) -> &str {
    name.strip_prefix('L')
        .and_then(|n| n.strip_suffix(';'))
        .unwrap_or(name)
}

/// Registers a `class:superclass[:interface...]` entry into the hierarchy.
/// Names are accepted either as `java/lang/String` or `Ljava/lang/String;`.
pub fn register_class(hierarchy: &mut Hierarchy, entry: &str) -> DwResult<()> {
    let names: Vec<&str> = entry.split(':').map(class_name).collect();
    match names.as_slice() {
        [class, superclass, interfaces @ ..]
            if !class.is_empty() && !superclass.is_empty() && !interfaces.contains(&"") =>
        {
            hierarchy.insert_extends(class, superclass);
            for interface in interfaces {
                hierarchy.insert_implements(class, interface);
            }
            Ok(())
        }
        _ => Err(DwError::BadArguments(format!(
            "bad class entry '{entry}', expected class:superclass[:interface...]"
        ))),
    }
}

/// The post-state of an execution: successors, registers, then the contents
/// of every referenced array.
pub struct Report<'a> {
    state: &'a MethodState,
    successors: &'a [Addr],
}

impl<'a> Report<'a> {
    #[must_use]
    pub const fn new(state: &'a MethodState, successors: &'a [Addr]) -> Self {
        Self { state, successors }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let successors: Vec<String> = self.successors.iter().map(ToString::to_string).collect();
        writeln!(f, "successors: {}", successors.join(", "))?;
        writeln!(f, "registers:")?;
        write!(f, "{}", self.state)?;
        for (reg, value) in self.state.iter() {
            if let AbstractValue::ArrayRef(array) = value {
                let contents: Vec<String> =
                    array.contents().iter().map(ToString::to_string).collect();
                writeln!(f, "{reg} contents: [{}]", contents.join(", "))?;
            }
        }
        Ok(())
    }
}
