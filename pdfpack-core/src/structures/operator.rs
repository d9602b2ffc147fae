use crate::error::Result;
use crate::objects::syntax::ByteCursor;
use crate::objects::Object;
use std::fmt;

/// Content stream operator with its operands, written as `a1 a2 ... op`.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    name: String,
    args: Vec<Object>,
}

impl Operator {
    pub fn of(name: impl Into<String>, args: Vec<Object>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Object] {
        &self.args
    }

    pub fn size_in_bytes(&self) -> Result<usize> {
        let mut size = self.name.len();
        for arg in &self.args {
            size += arg.size_in_bytes()? + 1;
        }
        Ok(size)
    }

    pub(crate) fn emit(&self, out: &mut ByteCursor<'_>) -> Result<()> {
        for arg in &self.args {
            arg.emit(out)?;
            out.put_byte(b' ')?;
        }
        out.put_str(&self.name)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for arg in &self.args {
            write!(f, "{arg} ")?;
        }
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_text() {
        let op = Operator::of("Tf", vec![Object::name("F1"), Object::Integer(12)]);
        assert_eq!(op.to_string(), "/F1 12 Tf");
        assert_eq!(op.size_in_bytes().unwrap(), 9);
        assert_eq!(op.name(), "Tf");
        assert_eq!(op.args().len(), 2);
    }

    #[test]
    fn test_operator_without_operands() {
        let op = Operator::of("BT", vec![]);
        assert_eq!(op.to_string(), "BT");
        assert_eq!(op.size_in_bytes().unwrap(), 2);
    }
}
