use std::fmt;

/// Numeric kind of a variable, fixed at its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Float,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Kind::Integer => f.write_str("int"),
            Kind::Float => f.write_str("float"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i32),
    Float(f64),
}

impl Value {
    pub fn zero(kind: Kind) -> Self {
        match kind {
            Kind::Integer => Value::Integer(0),
            Kind::Float => Value::Float(0.0),
        }
    }

    /// Converts `value` to `kind`. Integers truncate toward zero and saturate at the
    /// bounds of `i32`; NaN becomes zero.
    pub fn coerce(kind: Kind, value: f64) -> Self {
        match kind {
            Kind::Integer => Value::Integer(value as i32),
            Kind::Float => Value::Float(value),
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Integer(i) => f64::from(i),
            Value::Float(f) => f,
        }
    }
}

#[derive(Debug)]
struct Variable {
    name: String,
    value: Value,
}

/// Handle of a declared variable. Only valid for the table which returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarId(usize);

/// Flat, append-only mapping from variable names to typed slots.
///
/// Declaring a name twice is allowed; lookups always resolve to the first
/// declaration.
#[derive(Debug, Default)]
pub struct SymbolTable {
    variables: Vec<Variable>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, kind: Kind) -> VarId {
        self.variables.push(Variable {
            name: name.into(),
            value: Value::zero(kind),
        });
        VarId(self.variables.len() - 1)
    }

    pub fn lookup(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(VarId)
    }

    pub fn get(&self, id: VarId) -> Value {
        self.variables[id.0].value
    }

    pub fn kind(&self, id: VarId) -> Kind {
        self.get(id).kind()
    }

    pub fn name(&self, id: VarId) -> &str {
        &self.variables[id.0].name
    }

    /// Stores `value`, converted to the kind of the variable.
    pub fn assign(&mut self, id: VarId, value: f64) {
        let variable = &mut self.variables[id.0];
        variable.value = Value::coerce(variable.value.kind(), value);
    }
}
