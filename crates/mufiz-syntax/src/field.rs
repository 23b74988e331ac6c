//! Role names under which a node holds its children.

use std::fmt;

/// Named role of a child inside its parent node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Value,
    Condition,
    Then,
    Else,
    Body,
    Init,
    Update,
    Variable,
    Iterable,
    Parameters,
    Superclass,
    Left,
    Right,
    Operator,
    Operand,
    Function,
    Arguments,
    Object,
    Property,
    Index,
    Key,
    Real,
    Imaginary,
}

impl Field {
    pub const ALL: [Self; 24] = [
        Self::Name,
        Self::Value,
        Self::Condition,
        Self::Then,
        Self::Else,
        Self::Body,
        Self::Init,
        Self::Update,
        Self::Variable,
        Self::Iterable,
        Self::Parameters,
        Self::Superclass,
        Self::Left,
        Self::Right,
        Self::Operator,
        Self::Operand,
        Self::Function,
        Self::Arguments,
        Self::Object,
        Self::Property,
        Self::Index,
        Self::Key,
        Self::Real,
        Self::Imaginary,
    ];

    /// The field name as written in the grammar.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Value => "value",
            Self::Condition => "condition",
            Self::Then => "then",
            Self::Else => "else",
            Self::Body => "body",
            Self::Init => "init",
            Self::Update => "update",
            Self::Variable => "variable",
            Self::Iterable => "iterable",
            Self::Parameters => "parameters",
            Self::Superclass => "superclass",
            Self::Left => "left",
            Self::Right => "right",
            Self::Operator => "operator",
            Self::Operand => "operand",
            Self::Function => "function",
            Self::Arguments => "arguments",
            Self::Object => "object",
            Self::Property => "property",
            Self::Index => "index",
            Self::Key => "key",
            Self::Real => "real",
            Self::Imaginary => "imaginary",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.as_str()), Some(field));
        }
        assert_eq!(Field::from_name("elements"), None);
    }
}
