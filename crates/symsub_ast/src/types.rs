//! Flag types carried by tokens and nodes.

bitflags::bitflags! {
    /// Flags for syntax nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u32 {
        const NONE                          = 0;
        const LET                           = 1 << 0;
        const CONST                         = 1 << 1;
        /// Built by a rewrite pass rather than the parser. The range of a
        /// synthesized node is empty.
        const SYNTHESIZED                   = 1 << 2;
        const THIS_NODE_HAS_ERROR           = 1 << 3;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}

bitflags::bitflags! {
    /// Flags the scanner attaches to the current token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                              = 0;
        const PRECEDING_LINE_BREAK              = 1 << 0;
        const UNTERMINATED                      = 1 << 1;
        const SCIENTIFIC                        = 1 << 2;
        const HEX_SPECIFIER                     = 1 << 3;
        const BINARY_SPECIFIER                  = 1 << 4;
        const OCTAL_SPECIFIER                   = 1 << 5;
        const SINGLE_QUOTE                      = 1 << 6;
        const CONTAINS_ESCAPE                   = 1 << 7;

        const NUMERIC_LITERAL_FLAGS = Self::SCIENTIFIC.bits()
            | Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits();
    }
}

/// The declaration keyword of a variable statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn from_flags(flags: NodeFlags) -> Self {
        if flags.contains(NodeFlags::CONST) {
            VariableKind::Const
        } else if flags.contains(NodeFlags::LET) {
            VariableKind::Let
        } else {
            VariableKind::Var
        }
    }

    pub fn flags(self) -> NodeFlags {
        match self {
            VariableKind::Var => NodeFlags::NONE,
            VariableKind::Let => NodeFlags::LET,
            VariableKind::Const => NodeFlags::CONST,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}
