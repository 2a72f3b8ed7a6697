use crate::structure::{expose, free_vars};
use crate::ty::{Property, Type, TypeVar};
use crate::vars::{TyVars, VarId};

use snacks_print::ansi::{chars::*, RESET, TYPE, TYVAR};
use snacks_print::{PrettyPrint, PrettyString};

use std::collections::HashMap;
use std::{fmt, io};

impl PrettyPrint<TyVars> for Type {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        vars: &TyVars,
        _: usize,
    ) -> io::Result<()> {
        write_type(out, &expose(vars, self), &HashMap::new())
    }
}

/// Prints a type with its free variables renamed `'a`, `'b`, ... in order of
/// appearance, the way a generalized declaration type is shown to users.
pub struct Generalized<'a>(pub &'a Type);

impl<'a> PrettyPrint<TyVars> for Generalized<'a> {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        vars: &TyVars,
        _: usize,
    ) -> io::Result<()> {
        let names = free_vars(vars, self.0)
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v.id, letter_name(i)))
            .collect();
        write_type(out, &expose(vars, self.0), &names)
    }
}

/// Uncolored output for types that are already exposed.
impl<'a> fmt::Display for Generalized<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plain_string(&TyVars::new()))
    }
}

fn letter_name(i: usize) -> String {
    let letter = (b'a' + (i % 26) as u8) as char;
    match i / 26 {
        0 => letter.to_string(),
        n => format!("{letter}{n}"),
    }
}

fn write_type<Output: io::Write>(
    out: &mut Output,
    t: &Type,
    names: &HashMap<VarId, String>,
) -> io::Result<()> {
    match t {
        Type::Simple(name) => write!(out, "{TYPE}{name}{RESET}"),
        Type::Function(a, b) => {
            if matches!(**a, Type::Function(_, _) | Type::Union(_)) {
                write!(out, "{LPARN}")?;
                write_type(out, a, names)?;
                write!(out, "{RPARN}")?;
            } else {
                write_type(out, a, names)?;
            }
            write!(out, " {ARROW} ")?;
            write_type(out, b, names)
        }
        Type::Record(name, args, props) => {
            write!(out, "{TYPE}{name}{RESET}")?;
            write_arguments(out, args, names)?;
            write!(out, " {LBRACE} ")?;
            for (i, Property { name, ty }) in props.iter().enumerate() {
                if i > 0 {
                    write!(out, "{COMMA_SEP}")?;
                }
                write!(out, "{name}{COLON} ")?;
                write_type(out, ty, names)?;
            }
            write!(out, " {RBRACE}")
        }
        Type::Algebraic(name, args, _) | Type::Recursive(name, args) => {
            write!(out, "{TYPE}{name}{RESET}")?;
            write_arguments(out, args, names)
        }
        Type::Union(members) => {
            for (i, m) in members.iter().enumerate() {
                if i > 0 {
                    write!(out, "{PIPE_SEP}")?;
                }
                if m.is_function() {
                    write!(out, "{LPARN}")?;
                    write_type(out, m, names)?;
                    write!(out, "{RPARN}")?;
                } else {
                    write_type(out, m, names)?;
                }
            }
            Ok(())
        }
        Type::Variable(TypeVar { id, name }) => match names.get(id) {
            Some(n) => write!(out, "{TYVAR}'{n}{RESET}"),
            None => write!(out, "{TYVAR}'{name}{RESET}"),
        },
    }
}

fn write_arguments<Output: io::Write>(
    out: &mut Output,
    args: &[Type],
    names: &HashMap<VarId, String>,
) -> io::Result<()> {
    if args.is_empty() {
        return Ok(());
    }
    write!(out, "{LANGLE}")?;
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            write!(out, "{COMMA_SEP}")?;
        }
        write_type(out, a, names)?;
    }
    write!(out, "{RANGLE}")
}
