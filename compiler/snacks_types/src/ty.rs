use crate::vars::VarId;

use std::collections::HashMap;
use std::fmt;
use ustr::Ustr;

pub const BOOLEAN: &str = "Boolean";
pub const INTEGER: &str = "Integer";
pub const DOUBLE: &str = "Double";
pub const STRING: &str = "String";
pub const VOID: &str = "Void";

/// A unification variable. The binding lives in a [`crate::TyVars`] arena;
/// the name is only used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVar {
    pub id: VarId,
    pub name: Ustr,
}

/// A named property of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: Ustr,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// A nominal leaf type, e.g. `Integer`.
    Simple(Ustr),
    /// A curried function type.
    Function(Box<Type>, Box<Type>),
    /// A structural product type with ordered properties.
    Record(Ustr, Vec<Type>, Vec<Property>),
    /// A named sum type; the options are its constructor types.
    Algebraic(Ustr, Vec<Type>, Vec<Type>),
    /// Stands for the enclosing algebraic or record type of the same name.
    Recursive(Ustr, Vec<Type>),
    /// A choice among simultaneously valid types. Never holds fewer than two
    /// members when built through [`Type::union`].
    Union(Vec<Type>),
    Variable(TypeVar),
}

impl Type {
    pub fn simple(name: &str) -> Self {
        Type::Simple(Ustr::from(name))
    }

    pub fn boolean() -> Self {
        Self::simple(BOOLEAN)
    }

    pub fn integer() -> Self {
        Self::simple(INTEGER)
    }

    pub fn double() -> Self {
        Self::simple(DOUBLE)
    }

    pub fn string() -> Self {
        Self::simple(STRING)
    }

    pub fn void() -> Self {
        Self::simple(VOID)
    }

    pub fn func(argument: Type, result: Type) -> Self {
        Type::Function(Box::new(argument), Box::new(result))
    }

    /// Builds the curried function `a1 -> a2 -> ... -> result`.
    pub fn funcs(arguments: impl IntoIterator<Item = Type>, result: Type) -> Self {
        let arguments = arguments.into_iter().collect::<Vec<_>>();
        arguments
            .into_iter()
            .rev()
            .fold(result, |acc, arg| Type::func(arg, acc))
    }

    pub fn record<'a>(
        name: &str,
        arguments: Vec<Type>,
        properties: impl IntoIterator<Item = (&'a str, Type)>,
    ) -> Self {
        let properties = properties
            .into_iter()
            .map(|(name, ty)| Property {
                name: Ustr::from(name),
                ty,
            })
            .collect();
        Type::Record(Ustr::from(name), arguments, properties)
    }

    pub fn algebraic(name: &str, arguments: Vec<Type>, options: Vec<Type>) -> Self {
        Type::Algebraic(Ustr::from(name), arguments, options)
    }

    pub fn recursive(name: &str, arguments: Vec<Type>) -> Self {
        Type::Recursive(Ustr::from(name), arguments)
    }

    pub fn var(var: TypeVar) -> Self {
        Type::Variable(var)
    }

    /// Builds the union of the given members in normal form: nested unions are
    /// flattened, duplicates removed, a single member stands for itself, and an
    /// empty set has no type at all.
    pub fn union(members: impl IntoIterator<Item = Type>) -> Option<Type> {
        let mut flat: Vec<Type> = vec![];
        for member in members {
            match member {
                Type::Union(ms) => {
                    for m in ms {
                        if !flat.contains(&m) {
                            flat.push(m);
                        }
                    }
                }
                m => {
                    if !flat.contains(&m) {
                        flat.push(m);
                    }
                }
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(Type::Union(flat)),
        }
    }

    /// The nominal name of a type, if it has one.
    pub fn name(&self) -> Option<Ustr> {
        match self {
            Type::Simple(name)
            | Type::Record(name, _, _)
            | Type::Algebraic(name, _, _)
            | Type::Recursive(name, _) => Some(*name),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<TypeVar> {
        match self {
            Type::Variable(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(_, _))
    }

    pub fn type_arguments(&self) -> &[Type] {
        match self {
            Type::Record(_, args, _) | Type::Algebraic(_, args, _) | Type::Recursive(_, args) => {
                args
            }
            _ => &[],
        }
    }

    /// Returns the immediate children of a type.
    pub fn children(&self) -> Vec<&Type> {
        match self {
            Type::Simple(_) | Type::Variable(_) => vec![],
            Type::Function(a, b) => vec![&**a, &**b],
            Type::Record(_, args, props) => args
                .iter()
                .chain(props.iter().map(|p| &p.ty))
                .collect(),
            Type::Algebraic(_, args, options) => args.iter().chain(options.iter()).collect(),
            Type::Recursive(_, args) => args.iter().collect(),
            Type::Union(members) => members.iter().collect(),
        }
    }

    /// Rebuilds a type with each immediate child mapped through `f`.
    pub fn map_children(&self, mut f: impl FnMut(&Type) -> Type) -> Type {
        match self {
            Type::Simple(_) | Type::Variable(_) => self.clone(),
            Type::Function(a, b) => Type::func(f(&**a), f(&**b)),
            Type::Record(name, args, props) => Type::Record(
                *name,
                args.iter().map(&mut f).collect(),
                props
                    .iter()
                    .map(|p| Property {
                        name: p.name,
                        ty: f(&p.ty),
                    })
                    .collect(),
            ),
            Type::Algebraic(name, args, options) => Type::Algebraic(
                *name,
                args.iter().map(&mut f).collect(),
                options.iter().map(&mut f).collect(),
            ),
            Type::Recursive(name, args) => Type::Recursive(*name, args.iter().map(f).collect()),
            Type::Union(members) => {
                let members = members.iter().map(f).collect::<Vec<_>>();
                Type::union(members.clone()).unwrap_or(Type::Union(members))
            }
        }
    }

    /// Replaces variables by id. Bindings are not followed; expose first.
    pub fn substitute(&self, mapping: &HashMap<VarId, Type>) -> Type {
        match self {
            Type::Variable(v) => mapping.get(&v.id).cloned().unwrap_or(Type::Variable(*v)),
            t => t.map_children(|c| c.substitute(mapping)),
        }
    }

    /// Instantiates a definition (an algebraic or record type whose type
    /// arguments are its parameters) with concrete arguments.
    pub fn with_arguments(&self, arguments: &[Type]) -> Option<Type> {
        let params = self.type_arguments();
        if params.len() != arguments.len() {
            return None;
        }
        if params == arguments {
            return Some(self.clone());
        }

        let mapping = params
            .iter()
            .zip(arguments)
            .filter_map(|(p, a)| p.as_var().map(|v| (v.id, a.clone())))
            .collect::<HashMap<_, _>>();
        Some(self.substitute(&mapping))
    }

    /// Unrolls the enclosing type one level: every `Recursive` placeholder in
    /// `self` naming `owner` is replaced by `owner` applied to the
    /// placeholder's arguments. Nested definitions of the same name shadow the
    /// owner and are left untouched.
    pub fn unroll(&self, owner: &Type) -> Type {
        let Some(name) = owner.name() else {
            return self.clone();
        };
        self.unroll_named(name, owner)
    }

    fn unroll_named(&self, name: Ustr, owner: &Type) -> Type {
        match self {
            Type::Recursive(n, args) if *n == name => owner
                .with_arguments(args)
                .unwrap_or_else(|| self.clone()),
            Type::Algebraic(n, _, _) | Type::Record(n, _, _) if *n == name => self.clone(),
            t => t.map_children(|c| c.unroll_named(name, owner)),
        }
    }
}

impl From<TypeVar> for Type {
    fn from(var: TypeVar) -> Self {
        Type::Variable(var)
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}", self.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(name) => write!(f, "{name}"),
            Type::Function(a, b) => {
                if matches!(**a, Type::Function(_, _) | Type::Union(_)) {
                    write!(f, "({a}) -> {b}")
                } else {
                    write!(f, "{a} -> {b}")
                }
            }
            Type::Record(name, args, props) => {
                write!(f, "{name}")?;
                write_arguments(f, args)?;
                write!(f, " {{ ")?;
                for (i, p) in props.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", p.name, p.ty)?;
                }
                write!(f, " }}")
            }
            Type::Algebraic(name, args, _) | Type::Recursive(name, args) => {
                write!(f, "{name}")?;
                write_arguments(f, args)
            }
            Type::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    if m.is_function() {
                        write!(f, "({m})")?;
                    } else {
                        write!(f, "{m}")?;
                    }
                }
                Ok(())
            }
            Type::Variable(v) => write!(f, "{v}"),
        }
    }
}

fn write_arguments(f: &mut fmt::Formatter<'_>, args: &[Type]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    write!(f, "<")?;
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{a}")?;
    }
    write!(f, ">")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TyVars;
    use pretty_assertions::assert_eq;

    #[test]
    fn union_normal_form() {
        assert_eq!(Type::union(vec![]), None);
        assert_eq!(Type::union(vec![Type::integer()]), Some(Type::integer()));
        assert_eq!(
            Type::union(vec![Type::integer(), Type::integer()]),
            Some(Type::integer())
        );

        let nested = Type::union(vec![Type::integer(), Type::string()]).unwrap();
        let flat = Type::union(vec![nested, Type::double(), Type::string()]).unwrap();
        assert_eq!(
            flat,
            Type::Union(vec![Type::integer(), Type::string(), Type::double()])
        );
    }

    #[test]
    fn curried_functions() {
        let t = Type::funcs([Type::integer(), Type::double()], Type::double());
        assert_eq!(
            t,
            Type::func(Type::integer(), Type::func(Type::double(), Type::double()))
        );
        assert_eq!(t.to_string(), "Integer -> Double -> Double");
        let higher = Type::func(Type::func(Type::integer(), Type::integer()), Type::string());
        assert_eq!(higher.to_string(), "(Integer -> Integer) -> String");
    }

    #[test]
    fn display_named_types() {
        let mut vars = TyVars::new();
        let a = vars.fresh_named("a");
        let just = Type::record("Just", vec![a.into()], [("value", Type::from(a))]);
        assert_eq!(just.to_string(), "Just<'a> { value: 'a }");

        let maybe = Type::algebraic("Maybe", vec![Type::integer()], vec![]);
        assert_eq!(maybe.to_string(), "Maybe<Integer>");

        let u = Type::union(vec![Type::integer(), Type::func(Type::string(), Type::string())]);
        assert_eq!(u.unwrap().to_string(), "Integer | (String -> String)");
    }

    #[test]
    fn with_arguments_substitutes_parameters() {
        let mut vars = TyVars::new();
        let a = vars.fresh_named("a");
        let just = Type::record("Just", vec![a.into()], [("value", Type::from(a))]);
        let concrete = just.with_arguments(&[Type::integer()]).unwrap();
        assert_eq!(
            concrete,
            Type::record("Just", vec![Type::integer()], [("value", Type::integer())])
        );
        assert_eq!(just.with_arguments(&[]), None);
    }

    #[test]
    fn unroll_replaces_placeholder_once() {
        let mut vars = TyVars::new();
        let a = vars.fresh_named("a");
        let cons = Type::record(
            "Cons",
            vec![a.into()],
            [
                ("head", Type::from(a)),
                ("tail", Type::recursive("List", vec![a.into()])),
            ],
        );
        let list = Type::algebraic("List", vec![a.into()], vec![cons.clone(), Type::simple("Empty")]);

        let unrolled = cons.unroll(&list);
        let Type::Record(_, _, props) = &unrolled else {
            panic!("expected a record");
        };
        assert_eq!(props[1].ty, list);
        // the owner itself still refers to the placeholder
        assert_eq!(list.unroll(&list), list);
    }
}
