use std::fmt;

/// Error codes for every reported problem.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: AST building (malformed literal tokens)
/// - E2xxx: Resolution errors
/// - E6xxx: Evaluation faults
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Build Errors (E1xxx)
    /// Invalid string literal
    E1001,
    /// Invalid number literal
    E1002,

    // Resolution Errors (E2xxx)
    /// Unknown type
    E2001,
    /// Duplicate declaration
    E2002,
    /// Incompatible function type
    E2003,
    /// Unknown import
    E2004,
    /// Name not in scope
    E2005,
    /// `is` arm in a branch without subject
    E2006,
    /// `set` on a name not declared with `let variable`
    E2007,
    /// `break` outside a loop
    E2008,
    /// `return` outside a function
    E2009,
    /// Wrong number of arguments
    E2010,
    /// Initializer does not match declared type
    E2011,

    // Evaluation Faults (E6xxx)
    /// Unbound name
    E6001,
    /// No such field
    E6002,
    /// Unhandled signal
    E6003,
    /// Runtime type mismatch
    E6004,
    /// Value is not callable
    E6005,
    /// Value is not a signal
    E6006,
    /// Wrong number of arguments at runtime
    E6007,
    /// Assignment to immutable binding
    E6008,
    /// Runaway loop
    E6009,
    /// Recursion limit exceeded
    E6010,
    /// `break`/`return` escaped its target
    E6011,

    // Internal Errors (E9xxx)
    /// Internal interpreter error
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E6001 => "E6001",
            ErrorCode::E6002 => "E6002",
            ErrorCode::E6003 => "E6003",
            ErrorCode::E6004 => "E6004",
            ErrorCode::E6005 => "E6005",
            ErrorCode::E6006 => "E6006",
            ErrorCode::E6007 => "E6007",
            ErrorCode::E6008 => "E6008",
            ErrorCode::E6009 => "E6009",
            ErrorCode::E6010 => "E6010",
            ErrorCode::E6011 => "E6011",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Resolution errors stop a module before evaluation starts.
    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_runtime_fault(&self) -> bool {
        self.as_str().starts_with("E6")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E2001.to_string(), "E2001");
        assert_eq!(ErrorCode::E6003.to_string(), "E6003");
    }

    #[test]
    fn test_error_code_phase() {
        assert!(ErrorCode::E2003.is_resolution_error());
        assert!(!ErrorCode::E2003.is_runtime_fault());
        assert!(ErrorCode::E6001.is_runtime_fault());
        assert!(!ErrorCode::E1001.is_resolution_error());
    }
}
